//! Static fallback payloads, one per source

use chrono::Utc;
use civic_domain::{
    DatasetItem, FacilityItem, LineStatus, RegionalDataset, SourceId, SourcePayload,
    TransportStatus, WeatherReport,
};

/// Note attached when the forecast feed is unreachable
pub const WEATHER_FALLBACK_NOTE: &str = "気象庁APIに接続できないため、サンプルデータを表示しています";

/// Note attached when the open-data API is unreachable
pub const REGIONAL_FALLBACK_NOTE: &str = "東京都APIに接続できないため、サンプルデータを表示しています";

/// Note attached when the delay feed is unreachable
pub const TRANSPORT_FALLBACK_NOTE: &str = "交通情報APIに接続できないため、サンプルデータを表示";

/// Fallback payload of a source
pub fn for_source(id: SourceId) -> SourcePayload {
    match id {
        SourceId::Weather => weather(),
        SourceId::RegionalInfo => regional(),
        SourceId::Transport => transport(),
    }
}

/// Fallback note of a source
pub fn note_for(id: SourceId) -> &'static str {
    match id {
        SourceId::Weather => WEATHER_FALLBACK_NOTE,
        SourceId::RegionalInfo => REGIONAL_FALLBACK_NOTE,
        SourceId::Transport => TRANSPORT_FALLBACK_NOTE,
    }
}

/// Forecast substituted when the feed fails: area only, no forecast values
pub fn weather() -> SourcePayload {
    SourcePayload::Weather(WeatherReport {
        area: "東京".to_string(),
        overview: "予報データを取得できませんでした".to_string(),
        ..Default::default()
    })
}

/// Three well-known facilities
pub fn regional() -> SourcePayload {
    let items = [
        ("東京駅", "東京都千代田区丸の内1丁目", "交通施設", "東京の中央駅"),
        ("東京都庁", "東京都新宿区西新宿2-8-1", "行政施設", "東京都の本庁舎"),
        ("上野動物園", "東京都台東区上野公園9-83", "観光施設", "日本最古の動物園"),
    ]
    .into_iter()
    .map(|(name, address, kind, description)| {
        DatasetItem::Facility(FacilityItem {
            name: name.to_string(),
            address: address.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
        })
    })
    .collect::<Vec<_>>();

    SourcePayload::RegionalInfo(RegionalDataset {
        data_type: "sample".to_string(),
        total_count: items.len() as u64,
        items,
        source: "サンプルデータ（東京都API接続エラー時）".to_string(),
        last_update: Utc::now(),
    })
}

/// Central Tokyo stations, all running normally
pub fn transport() -> SourcePayload {
    let now = Utc::now();
    let normal = |station: &str, line: &str| LineStatus {
        station: station.to_string(),
        line: line.to_string(),
        status: "正常".to_string(),
        delay: None,
        last_update: now,
    };

    SourcePayload::Transport(TransportStatus {
        region: "unknown".to_string(),
        requested_station: String::new(),
        major_stations: vec!["東京".to_string(), "新宿".to_string(), "渋谷".to_string()],
        operation_status: vec![normal("東京", "山手線"), normal("新宿", "JR各線")],
        real_time_data: None,
        available_regions: Vec::new(),
        source: Some("フォールバックデータ".to_string()),
        last_update: now,
    })
}
