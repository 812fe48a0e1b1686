use terrane_blocks::BlockType;
use terrane_geom::Vec3;
use terrane_world::{CHUNK_SIZE, ChunkKey};

use crate::wire::{PacketError, Reader, write_f32, write_i32, write_i64, write_u8};

/// Leading byte of every packet.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketTag {
    PlayerState = 0,
    WorldInit = 1,
    ChunkChange = 2,
    BlockChange = 3,
    ItemEntityState = 4,
    DeleteItemEntity = 5,
    EntityState = 6,
    DeleteEntity = 7,
}

/// One changed cell inside a chunk, with x and z packed as `16 * x + z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub xz: u8,
    pub y: u8,
    pub block: BlockType,
}

impl CellChange {
    pub fn new(x: usize, y: u8, z: usize, block: BlockType) -> Self {
        assert!(
            x < CHUNK_SIZE as usize && z < CHUNK_SIZE as usize,
            "cell ({x}, {z}) outside a chunk"
        );
        Self {
            xz: (x * CHUNK_SIZE as usize + z) as u8,
            y,
            block,
        }
    }

    #[inline]
    pub fn x(&self) -> usize {
        self.xz as usize / CHUNK_SIZE as usize
    }

    #[inline]
    pub fn z(&self) -> usize {
        self.xz as usize % CHUNK_SIZE as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    PlayerState {
        player_id: i32,
        pos: Vec3,
        theta: f32,
        phi: f32,
    },
    WorldInit {
        seed: i32,
        spawn: Vec3,
    },
    ChunkChange {
        chunk: ChunkKey,
        changes: Vec<CellChange>,
    },
    BlockChange {
        chunk: ChunkKey,
        y: u8,
        block: BlockType,
    },
    /// A tag this side does not decode. The rest of the buffer is ignored.
    /// Encodes as the lone tag byte, so it only decodes back to itself when
    /// `tag` is not one of the decoded packet tags.
    Unrecognized {
        tag: u8,
    },
}

impl Packet {
    pub fn tag(&self) -> u8 {
        match self {
            Packet::PlayerState { .. } => PacketTag::PlayerState as u8,
            Packet::WorldInit { .. } => PacketTag::WorldInit as u8,
            Packet::ChunkChange { .. } => PacketTag::ChunkChange as u8,
            Packet::BlockChange { .. } => PacketTag::BlockChange as u8,
            Packet::Unrecognized { tag } => *tag,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(32);
        write_u8(&mut out, self.tag());
        match self {
            Packet::PlayerState {
                player_id,
                pos,
                theta,
                phi,
            } => {
                write_i32(&mut out, *player_id);
                write_vec3(&mut out, *pos);
                write_f32(&mut out, *theta);
                write_f32(&mut out, *phi);
            }
            Packet::WorldInit { seed, spawn } => {
                write_i32(&mut out, *seed);
                write_vec3(&mut out, *spawn);
            }
            Packet::ChunkChange { chunk, changes } => {
                write_i64(&mut out, chunk.raw());
                write_i32(&mut out, changes.len() as i32);
                out.reserve(3 * changes.len());
                for c in changes {
                    write_u8(&mut out, c.xz);
                    write_u8(&mut out, c.y);
                    write_u8(&mut out, c.block.as_u8());
                }
            }
            Packet::BlockChange { chunk, y, block } => {
                write_i64(&mut out, chunk.raw());
                write_u8(&mut out, *y);
                write_u8(&mut out, block.as_u8());
            }
            Packet::Unrecognized { .. } => {}
        }
        out
    }

    pub fn decode(data: &[u8]) -> Result<Packet, PacketError> {
        let mut r = Reader::new(data);
        let tag = r.u8()?;
        let packet = match tag {
            t if t == PacketTag::PlayerState as u8 => Packet::PlayerState {
                player_id: r.i32()?,
                pos: read_vec3(&mut r)?,
                theta: r.f32()?,
                phi: r.f32()?,
            },
            t if t == PacketTag::WorldInit as u8 => Packet::WorldInit {
                seed: r.i32()?,
                spawn: read_vec3(&mut r)?,
            },
            t if t == PacketTag::ChunkChange as u8 => {
                let chunk = ChunkKey::from_raw(r.i64()?);
                let n = r.i32()?;
                if n < 0 {
                    return Err(PacketError::BadCount(n));
                }
                let mut changes = Vec::with_capacity((n as usize).min(data.len() / 3));
                for _ in 0..n {
                    changes.push(CellChange {
                        xz: r.u8()?,
                        y: r.u8()?,
                        block: r.block()?,
                    });
                }
                Packet::ChunkChange { chunk, changes }
            }
            t if t == PacketTag::BlockChange as u8 => Packet::BlockChange {
                chunk: ChunkKey::from_raw(r.i64()?),
                y: r.u8()?,
                block: r.block()?,
            },
            tag => Packet::Unrecognized { tag },
        };
        Ok(packet)
    }
}

fn write_vec3(out: &mut Vec<u8>, v: Vec3) {
    write_f32(out, v.x);
    write_f32(out, v.y);
    write_f32(out, v.z);
}

fn read_vec3(r: &mut Reader<'_>) -> Result<Vec3, PacketError> {
    Ok(Vec3::new(r.f32()?, r.f32()?, r.f32()?))
}
