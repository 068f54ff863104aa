//! Plain-text rendering of monitor output.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use fleetwatch_core::{AppConfig, FilterConfig, FilteredResult};

pub fn render_list(
    config: &AppConfig,
    result: &FilteredResult,
    fetched_at: Option<DateTime<Utc>>,
    catalog_warning: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(fetched_at) = fetched_at {
        let _ = writeln!(
            out,
            "fetched {}",
            fetched_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        );
    }
    if let Some(warning) = catalog_warning {
        let _ = writeln!(out, "warning: trailers not excluded ({warning})");
    }
    let _ = writeln!(out, "{} vehicles without personnel", result.len());
    if result.is_empty() {
        return out;
    }

    let _ = writeln!(out, "ids: {}", result.joined_ids());
    for vehicle in result.vehicles() {
        let _ = writeln!(
            out,
            "  {}  {}",
            vehicle.display_name(),
            config.assignment_url(vehicle)
        );
    }
    out
}

pub fn render_filter(filter: &FilterConfig) -> String {
    let ids = if filter.type_ids.is_empty() {
        "(none)".to_string()
    } else {
        filter.joined_type_ids()
    };
    format!("mode: {}\ntypes: {}\n", filter.mode, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fleetwatch_core::{filter_fleet, FilterMode, TrailerIdSet, VehicleRecord};

    fn result() -> FilteredResult {
        let vehicles = vec![
            VehicleRecord {
                id: 11,
                caption: "LF 20".to_string(),
                vehicle_type: 0,
                assigned_personnel_count: Some(0),
            },
            VehicleRecord {
                id: 12,
                caption: "DLK".to_string(),
                vehicle_type: 2,
                assigned_personnel_count: Some(3),
            },
        ];
        filter_fleet(&vehicles, &TrailerIdSet::new(), &FilterConfig::default())
    }

    #[test]
    fn list_shows_count_ids_and_links() {
        let rendered = render_list(&AppConfig::default(), &result(), None, None);
        assert!(rendered.starts_with("1 vehicles without personnel\n"));
        assert!(rendered.contains("ids: 11\n"));
        assert!(rendered.contains(
            "LF 20 (ID: 11)  https://www.leitstellenspiel.de/vehicles/11/zuweisung"
        ));
        assert!(!rendered.contains("DLK"));
    }

    #[test]
    fn list_reports_catalog_warning() {
        let rendered = render_list(
            &AppConfig::default(),
            &FilteredResult::default(),
            None,
            Some("timed out"),
        );
        assert_eq!(
            rendered,
            "warning: trailers not excluded (timed out)\n0 vehicles without personnel\n"
        );
    }

    #[test]
    fn list_starts_with_fetch_time() {
        let fetched_at = Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 0).unwrap();
        let rendered = render_list(
            &AppConfig::default(),
            &FilteredResult::default(),
            Some(fetched_at),
            None,
        );
        let expected = fetched_at
            .with_timezone(&Local)
            .format("fetched %Y-%m-%d %H:%M:%S\n0 vehicles without personnel\n")
            .to_string();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn filter_rendering() {
        assert_eq!(
            render_filter(&FilterConfig::default()),
            "mode: exclude\ntypes: (none)\n"
        );
        assert_eq!(
            render_filter(&FilterConfig::new([31, 30], FilterMode::IncludeOnly)),
            "mode: includeOnly\ntypes: 30,31\n"
        );
    }
}
