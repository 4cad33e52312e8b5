use crate::error::{RadarError, RadarResult};

/// One registered radar location. The table below is loaded at compile time
/// and never mutated; callers hold `&'static Site` references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Site {
    pub name: &'static str,
    /// Numeric imagery id used in upstream URLs (zero-padded, as published).
    pub id: &'static str,
    /// Refresh interval in seconds; also the snapshot spacing.
    pub delta: u64,
    /// Number of snapshots per loop.
    pub frames: usize,
}

/// Every supported radar location, sorted by name.
pub static SITES: &[Site] = &[
    Site { name: "Adelaide", id: "643", delta: 360, frames: 6 },
    Site { name: "Albany", id: "313", delta: 600, frames: 4 },
    Site { name: "AliceSprings", id: "253", delta: 600, frames: 4 },
    Site { name: "Bairnsdale", id: "683", delta: 600, frames: 4 },
    Site { name: "Bowen", id: "243", delta: 600, frames: 4 },
    Site { name: "Brisbane", id: "663", delta: 360, frames: 6 },
    Site { name: "Broome", id: "173", delta: 600, frames: 4 },
    Site { name: "Cairns", id: "193", delta: 360, frames: 6 },
    Site { name: "Canberra", id: "403", delta: 360, frames: 6 },
    Site { name: "Carnarvon", id: "053", delta: 600, frames: 4 },
    Site { name: "Ceduna", id: "333", delta: 600, frames: 4 },
    Site { name: "Dampier", id: "153", delta: 600, frames: 4 },
    Site { name: "Darwin", id: "633", delta: 360, frames: 6 },
    Site { name: "Emerald", id: "723", delta: 600, frames: 4 },
    Site { name: "Esperance", id: "323", delta: 600, frames: 4 },
    Site { name: "Geraldton", id: "063", delta: 600, frames: 4 },
    Site { name: "Giles", id: "443", delta: 600, frames: 4 },
    Site { name: "Gladstone", id: "233", delta: 600, frames: 4 },
    Site { name: "Gove", id: "093", delta: 600, frames: 4 },
    Site { name: "Grafton", id: "283", delta: 600, frames: 4 },
    Site { name: "Gympie", id: "083", delta: 360, frames: 6 },
    Site { name: "HallsCreek", id: "393", delta: 600, frames: 4 },
    Site { name: "Hobart", id: "763", delta: 360, frames: 6 },
    Site { name: "Kalgoorlie", id: "483", delta: 360, frames: 6 },
    Site { name: "Katherine", id: "423", delta: 360, frames: 6 },
    Site { name: "Learmonth", id: "293", delta: 600, frames: 4 },
    Site { name: "Longreach", id: "563", delta: 600, frames: 4 },
    Site { name: "Mackay", id: "223", delta: 600, frames: 4 },
    Site { name: "Marburg", id: "503", delta: 600, frames: 4 },
    Site { name: "Melbourne", id: "023", delta: 360, frames: 6 },
    Site { name: "Mildura", id: "303", delta: 600, frames: 4 },
    Site { name: "Moree", id: "533", delta: 600, frames: 4 },
    Site { name: "MorningtonIs", id: "363", delta: 600, frames: 4 },
    Site { name: "MountIsa", id: "753", delta: 360, frames: 6 },
    Site { name: "MtGambier", id: "143", delta: 600, frames: 4 },
    Site { name: "NWTasmania", id: "523", delta: 360, frames: 6 },
    Site { name: "Namoi", id: "693", delta: 600, frames: 4 },
    Site { name: "Newcastle", id: "043", delta: 360, frames: 6 },
    Site { name: "Newdegate", id: "383", delta: 360, frames: 6 },
    Site { name: "NorfolkIs", id: "623", delta: 600, frames: 4 },
    Site { name: "Perth", id: "703", delta: 360, frames: 6 },
    Site { name: "PortHedland", id: "163", delta: 600, frames: 4 },
    Site { name: "SellicksHill", id: "463", delta: 600, frames: 4 },
    Site { name: "SouthDoodlakine", id: "583", delta: 360, frames: 6 },
    Site { name: "Sydney", id: "713", delta: 360, frames: 6 },
    Site { name: "Townsville", id: "733", delta: 360, frames: 6 },
    Site { name: "WaggaWagga", id: "553", delta: 600, frames: 4 },
    Site { name: "Warrego", id: "673", delta: 600, frames: 4 },
    Site { name: "Warruwi", id: "773", delta: 360, frames: 6 },
    Site { name: "Watheroo", id: "793", delta: 360, frames: 6 },
    Site { name: "Weipa", id: "783", delta: 360, frames: 6 },
    Site { name: "WillisIs", id: "413", delta: 600, frames: 4 },
    Site { name: "Wollongong", id: "033", delta: 360, frames: 6 },
    Site { name: "Woomera", id: "273", delta: 600, frames: 4 },
    Site { name: "Wyndham", id: "073", delta: 600, frames: 4 },
    Site { name: "Yarrawonga", id: "493", delta: 360, frames: 6 },
];

/// Resolve a location name against the closed set of supported sites.
/// Unknown names fail fast so misconfiguration is caught at startup, not at
/// the first loop build.
pub fn lookup(name: &str) -> RadarResult<&'static Site> {
    SITES.iter().find(|site| site.name == name).ok_or_else(|| {
        let known: Vec<&str> = SITES.iter().map(|site| site.name).collect();
        RadarError::validation(format!(
            "unknown radar location '{name}'; set location to one of: {}",
            known.join(", ")
        ))
    })
}
