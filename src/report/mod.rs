// src/report/mod.rs

pub mod html;
pub mod model;
pub mod raster;

pub use model::{InfoEntry, ReportMeta, ReportModel, ScoreCard};

use crate::classify::Band;

/// `[accent, card background, card border]` colors per band, as RGB triples.
/// Both renderers draw from this one table; the HTML side formats them as
/// hex, the raster side feeds them straight to the backend.
pub fn band_palette(band: Band) -> [(u8, u8, u8); 3] {
    match band {
        Band::Excellent => [(0x05, 0x96, 0x69), (0xec, 0xfd, 0xf5), (0xa7, 0xf3, 0xd0)],
        Band::Good => [(0x25, 0x63, 0xeb), (0xef, 0xf6, 0xff), (0xbf, 0xdb, 0xfe)],
        Band::Fair => [(0xd9, 0x77, 0x06), (0xff, 0xfb, 0xeb), (0xfd, 0xe6, 0x8a)],
        Band::Poor => [(0xdc, 0x26, 0x26), (0xfe, 0xf2, 0xf2), (0xfe, 0xca, 0xca)],
    }
}

fn hex(rgb: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)
}
