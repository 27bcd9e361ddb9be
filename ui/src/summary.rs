//! Human-readable lines for the photo hover card.

use api_client::PhotoSummary;

pub fn summary_lines(summary: &PhotoSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(name) = &summary.name {
        lines.push(name.clone());
    }
    if let Some(taken) = summary.date_time_original {
        lines.push(taken.format("%Y-%m-%d %H:%M").to_string());
    }

    let camera: Vec<&str> = [summary.make.as_deref(), summary.model.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !camera.is_empty() {
        lines.push(camera.join(" "));
    }

    if let (Some(w), Some(h)) = (summary.width, summary.height) {
        lines.push(format!("{} × {}", w, h));
    }

    let mut exposure = Vec::new();
    if let Some(aperture) = summary.aperture {
        exposure.push(format!("f/{}", trim_float(aperture)));
    }
    if let Some(shutter) = &summary.shutter_speed {
        exposure.push(format!("{}s", shutter));
    }
    if let Some(iso) = summary.iso_speed {
        exposure.push(format!("ISO {}", iso));
    }
    if let Some(focal) = summary.focal_length {
        exposure.push(format!("{}mm", trim_float(focal)));
    }
    if !exposure.is_empty() {
        lines.push(exposure.join("  "));
    }

    if let (Some(lat), Some(lon)) = (&summary.gps_latitude, &summary.gps_longitude) {
        lines.push(format!("{}, {}", lat, lon));
    }

    if lines.is_empty() {
        lines.push("No metadata".to_string());
    }
    lines
}

fn trim_float(value: f64) -> String {
    let s = format!("{:.1}", value);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_full_summary() {
        let summary = PhotoSummary {
            id: "p1".into(),
            make: Some("FUJIFILM".into()),
            model: Some("X100V".into()),
            date_time_original: NaiveDate::from_ymd_opt(2023, 7, 14)
                .and_then(|d| d.and_hms_opt(18, 3, 0)),
            width: Some(6240),
            height: Some(4160),
            iso_speed: Some(160),
            aperture: Some(2.0),
            shutter_speed: Some("1/500".into()),
            focal_length: Some(23.5),
            ..Default::default()
        };
        assert_eq!(
            summary_lines(&summary),
            vec![
                "2023-07-14 18:03".to_string(),
                "FUJIFILM X100V".to_string(),
                "6240 × 4160".to_string(),
                "f/2  1/500s  ISO 160  23.5mm".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = PhotoSummary {
            id: "p1".into(),
            ..Default::default()
        };
        assert_eq!(summary_lines(&summary), vec!["No metadata".to_string()]);
    }
}
