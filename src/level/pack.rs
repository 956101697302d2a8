//! Level packs.
//!
//! Levels are data: a pack is a JSON array of [LevelDefinition]s, so operators can ship new
//! puzzles without recompiling. When no pack is configured the built-in demo levels are used.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::level::condition::{
    BlockCondition, BlockPlacement, ConditionLevel, FillRegion, LevelDefinition,
};
use crate::level::driver::LevelFactory;
use crate::level::world::BlockPos;
use crate::level::Level;

#[derive(Debug, Error)]
pub enum LevelPackError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("level pack {0} contains no levels")]
    Empty(String),

    #[error("level '{0}' has no conditions")]
    NoConditions(String),
}

/// Load and sanity-check a level pack.
pub fn load_levels_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<LevelDefinition>, LevelPackError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let levels: Vec<LevelDefinition> =
        serde_json::from_str(&contents).map_err(|source| LevelPackError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    if levels.is_empty() {
        return Err(LevelPackError::Empty(path.display().to_string()));
    }
    if let Some(bad) = levels.iter().find(|l| l.conditions.is_empty()) {
        return Err(LevelPackError::NoConditions(bad.name.clone()));
    }
    Ok(levels)
}

pub fn catalog_from_definitions(defs: Vec<LevelDefinition>) -> Vec<LevelFactory> {
    defs.into_iter()
        .map(|def| {
            Box::new(move || Box::new(ConditionLevel::new(def.clone())) as Box<dyn Level>)
                as LevelFactory
        })
        .collect()
}

/// Two small bridge-and-path puzzles over a water moat.
pub fn builtin_levels() -> Vec<LevelDefinition> {
    vec![
        LevelDefinition {
            name: "bridge".to_string(),
            title: "Level 1: Cross the moat".to_string(),
            hint: Some("Place planks across the water".to_string()),
            start: BlockPos::new(0, 1, 0),
            end: BlockPos::new(0, 1, 3),
            out_of_bounds_block: "water".to_string(),
            conditions: vec![
                BlockCondition::new(BlockPos::new(0, 0, 1), "planks"),
                BlockCondition::new(BlockPos::new(0, 0, 2), "planks"),
            ],
            retry_trigger: Some(BlockPlacement {
                position: BlockPos::new(1, 1, 0),
                block: "pressure_plate".to_string(),
            }),
            setup: vec![
                FillRegion {
                    from: BlockPos::new(-1, 0, 0),
                    to: BlockPos::new(1, 0, 3),
                    block: "water".to_string(),
                },
                FillRegion {
                    from: BlockPos::new(0, 0, 0),
                    to: BlockPos::new(0, 0, 0),
                    block: "stone".to_string(),
                },
                FillRegion {
                    from: BlockPos::new(0, 0, 3),
                    to: BlockPos::new(0, 0, 3),
                    block: "stone".to_string(),
                },
            ],
        },
        LevelDefinition {
            name: "torches".to_string(),
            title: "Level 2: Light the path".to_string(),
            hint: Some("Put torches on both posts".to_string()),
            start: BlockPos::new(0, 1, 0),
            end: BlockPos::new(4, 1, 0),
            out_of_bounds_block: "lava".to_string(),
            conditions: vec![
                BlockCondition::new(BlockPos::new(1, 1, 1), "torch"),
                BlockCondition::new(BlockPos::new(3, 1, 1), "torch"),
            ],
            retry_trigger: None,
            setup: vec![
                FillRegion {
                    from: BlockPos::new(0, 0, -1),
                    to: BlockPos::new(4, 0, 1),
                    block: "lava".to_string(),
                },
                FillRegion {
                    from: BlockPos::new(0, 0, 0),
                    to: BlockPos::new(4, 0, 0),
                    block: "stone".to_string(),
                },
            ],
        },
    ]
}
