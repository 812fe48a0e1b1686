use crate::types::BlockType;

/// 8-bit RGBA vertex color.
pub type Rgba = [u8; 4];

const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r, g, b, 255]
}

impl BlockType {
    /// Flat per-material color used for every face of this block.
    pub const fn color(self) -> Rgba {
        match self {
            BlockType::Empty => [0, 0, 0, 0],
            BlockType::Grass | BlockType::GrassBlock => rgb(0, 255, 0),
            BlockType::Dirt => rgb(181, 155, 90),
            BlockType::Stone | BlockType::Cobblestone => rgb(128, 128, 128),
            BlockType::Water => [0, 0, 255, 128],
            BlockType::Sand => rgb(255, 255, 0),
            BlockType::Snow | BlockType::Glass => rgb(255, 255, 255),
            BlockType::OakPlanks => rgb(221, 195, 130),
            BlockType::SprucePlanks => rgb(130, 96, 52),
            BlockType::JunglePlanks => rgb(176, 122, 86),
            BlockType::BirchPlanks => rgb(214, 200, 140),
            BlockType::AcaciaPlanks => rgb(186, 100, 52),
            BlockType::OakLog => rgb(151, 125, 60),
            BlockType::SpruceLog => rgb(70, 50, 28),
            BlockType::BirchLog => rgb(220, 220, 210),
            BlockType::JungleLog => rgb(98, 76, 30),
            BlockType::AcaciaLog => rgb(104, 96, 88),
            BlockType::OakLeaves => rgb(0, 128, 0),
            BlockType::Bookshelf => rgb(120, 70, 40),
            BlockType::Path => rgb(211, 185, 120),
            BlockType::Sandstone => rgb(220, 208, 160),
            BlockType::Lava => rgb(230, 90, 10),
            BlockType::Bedrock => rgb(40, 40, 40),
            BlockType::Cactus => rgb(20, 110, 30),
            BlockType::Ice => [160, 200, 255, 200],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_is_invisible() {
        for b in BlockType::ALL {
            assert_eq!(b.color()[3] == 0, b == BlockType::Empty, "{b:?}");
        }
    }
}
