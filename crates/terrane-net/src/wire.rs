use terrane_blocks::BlockType;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    #[error("packet truncated: needed {needed} bytes at offset {at}")]
    Truncated { at: usize, needed: usize },
    #[error("unknown block type {0}")]
    UnknownBlock(u8),
    #[error("negative change count {0}")]
    BadCount(i32),
}

pub(crate) fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

pub(crate) fn write_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn write_i64(out: &mut Vec<u8>, v: i64) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Floats travel as big-endian doubles.
pub(crate) fn write_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&f64::from(v).to_be_bytes());
}

/// Cursor over an incoming buffer.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    at: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, at: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], PacketError> {
        let end = self.at.saturating_add(N);
        if end > self.data.len() {
            return Err(PacketError::Truncated {
                at: self.at,
                needed: N,
            });
        }
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.at..end]);
        self.at = end;
        Ok(buf)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, PacketError> {
        Ok(self.take::<1>()?[0])
    }

    pub(crate) fn i32(&mut self) -> Result<i32, PacketError> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    pub(crate) fn i64(&mut self) -> Result<i64, PacketError> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    pub(crate) fn f32(&mut self) -> Result<f32, PacketError> {
        Ok(f64::from_be_bytes(self.take()?) as f32)
    }

    pub(crate) fn block(&mut self) -> Result<BlockType, PacketError> {
        let v = self.u8()?;
        BlockType::from_u8(v).ok_or(PacketError::UnknownBlock(v))
    }
}
