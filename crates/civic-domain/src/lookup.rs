//! Fixed lookup tables for the external providers.
//!
//! Each table is a closed enum. Parsing never fails: an unknown key resolves
//! to the table's default entry, which is how the providers' query
//! parameters have always been interpreted.

use serde::{Deserialize, Serialize};

/// Forecast area understood by the weather feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    /// Tokyo metropolis
    #[default]
    Tokyo,
    /// Osaka prefecture
    Osaka,
    /// Aichi prefecture
    Aichi,
    /// Fukuoka prefecture
    Fukuoka,
    /// Hokkaido (Ishikari / Sorachi / Shiribeshi office)
    Hokkaido,
}

impl Area {
    /// All areas, in table order
    pub const ALL: [Area; 5] = [
        Area::Tokyo,
        Area::Osaka,
        Area::Aichi,
        Area::Fukuoka,
        Area::Hokkaido,
    ];

    /// Query-parameter key
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Tokyo => "tokyo",
            Area::Osaka => "osaka",
            Area::Aichi => "aichi",
            Area::Fukuoka => "fukuoka",
            Area::Hokkaido => "hokkaido",
        }
    }

    /// Six-digit office code used in forecast feed paths
    pub fn code(&self) -> &'static str {
        match self {
            Area::Tokyo => "130000",
            Area::Osaka => "270000",
            Area::Aichi => "230000",
            Area::Fukuoka => "400000",
            Area::Hokkaido => "016000",
        }
    }

    /// Resolve a query-parameter key, falling back to Tokyo
    pub fn parse_or_default(s: &str) -> Self {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|area| area.as_str() == key)
            .unwrap_or_default()
    }
}

/// Region used to pick the major stations reported by the transport source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Hokkaido
    Hokkaido,
    /// Tohoku
    Tohoku,
    /// Kanto
    #[default]
    Kanto,
    /// Chubu
    Chubu,
    /// Kansai
    Kansai,
    /// Chugoku
    Chugoku,
    /// Shikoku
    Shikoku,
    /// Kyushu
    Kyushu,
}

impl Region {
    /// All regions, in table order
    pub const ALL: [Region; 8] = [
        Region::Hokkaido,
        Region::Tohoku,
        Region::Kanto,
        Region::Chubu,
        Region::Kansai,
        Region::Chugoku,
        Region::Shikoku,
        Region::Kyushu,
    ];

    /// Query-parameter key
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Hokkaido => "hokkaido",
            Region::Tohoku => "tohoku",
            Region::Kanto => "kanto",
            Region::Chubu => "chubu",
            Region::Kansai => "kansai",
            Region::Chugoku => "chugoku",
            Region::Shikoku => "shikoku",
            Region::Kyushu => "kyushu",
        }
    }

    /// Major stations of the region
    pub fn stations(&self) -> &'static [&'static str] {
        match self {
            Region::Hokkaido => &["札幌", "新千歳空港", "函館"],
            Region::Tohoku => &["仙台", "青森", "盛岡", "秋田", "山形", "福島"],
            Region::Kanto => &["東京", "新宿", "渋谷", "池袋", "横浜", "大宮"],
            Region::Chubu => &["名古屋", "金沢", "新潟", "長野", "静岡"],
            Region::Kansai => &["大阪", "京都", "神戸", "奈良", "和歌山"],
            Region::Chugoku => &["広島", "岡山", "山口", "鳥取", "島根"],
            Region::Shikoku => &["高松", "徳島", "松山", "高知"],
            Region::Kyushu => &["福岡", "博多", "熊本", "鹿児島", "長崎", "大分"],
        }
    }

    /// Resolve a query-parameter key, falling back to Kanto
    pub fn parse_or_default(s: &str) -> Self {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == key)
            .unwrap_or_default()
    }

    /// Keys of every region, for discovery responses
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(Region::as_str).collect()
    }
}

/// Dataset published by the metropolitan open-data API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Population statistics
    Population,
    /// Public facilities
    #[default]
    Facilities,
    /// Tourist spots
    Tourism,
    /// Transport information
    Transport,
}

impl Dataset {
    /// All datasets, in table order
    pub const ALL: [Dataset; 4] = [
        Dataset::Population,
        Dataset::Facilities,
        Dataset::Tourism,
        Dataset::Transport,
    ];

    /// Query-parameter key
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Population => "population",
            Dataset::Facilities => "facilities",
            Dataset::Tourism => "tourism",
            Dataset::Transport => "transport",
        }
    }

    /// API identifier of the dataset
    pub fn api_id(&self) -> &'static str {
        match self {
            Dataset::Population => "t000001d0000000001-population-data-0",
            Dataset::Facilities => "t132047d0000000004-44947822b3c13ba51b59e3278e2d018c-0",
            Dataset::Tourism => "t132047d0000000005-tourism-spots-data-0",
            Dataset::Transport => "t000001d0000000020-transport-info-0",
        }
    }

    /// Resolve a query-parameter key, falling back to facilities
    pub fn parse_or_default(s: &str) -> Self {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|dataset| dataset.as_str() == key)
            .unwrap_or_default()
    }

    /// Keys of every dataset, for discovery responses
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(Dataset::as_str).collect()
    }
}
