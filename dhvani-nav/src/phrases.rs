//! Spoken phrasing helpers for distances and names.

/// Capitalize the first letter ("proximity door" -> "Proximity door").
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Coarse spoken distance ("close", "7 meters", "far").
pub fn spoken_distance(distance: f32) -> String {
    let meters = (distance / 1000.0).max(0.0) as u32;
    match meters {
        0..=1 => "very close".to_string(),
        2..=4 => "close".to_string(),
        5..=9 => format!("{} meters", meters),
        10..=19 => "medium range".to_string(),
        20..=49 => "far".to_string(),
        _ => "very far".to_string(),
    }
}

/// Short description of how near an obstacle ahead is.
pub fn nearness(distance: f32) -> &'static str {
    if distance < 1500.0 {
        "very close"
    } else if distance < 3000.0 {
        "close"
    } else if distance < 6000.0 {
        "ahead"
    } else {
        "far"
    }
}

/// Spatial qualifier used in environment descriptions.
pub fn spatial(distance: f32) -> &'static str {
    if distance < 2000.0 {
        "immediately"
    } else if distance < 5000.0 {
        "nearby"
    } else if distance < 10_000.0 {
        ""
    } else {
        "in the distance"
    }
}

/// Whole meters, never less than one.
pub fn whole_meters(distance: f32) -> u32 {
    ((distance / 1000.0) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("proximity door"), "Proximity door");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_spoken_distance_bands() {
        assert_eq!(spoken_distance(500.0), "very close");
        assert_eq!(spoken_distance(1999.0), "very close");
        assert_eq!(spoken_distance(3000.0), "close");
        assert_eq!(spoken_distance(7400.0), "7 meters");
        assert_eq!(spoken_distance(15_000.0), "medium range");
        assert_eq!(spoken_distance(30_000.0), "far");
        assert_eq!(spoken_distance(80_000.0), "very far");
    }

    #[test]
    fn test_nearness_and_spatial() {
        assert_eq!(nearness(1000.0), "very close");
        assert_eq!(nearness(2000.0), "close");
        assert_eq!(nearness(4000.0), "ahead");
        assert_eq!(nearness(9000.0), "far");
        assert_eq!(spatial(1000.0), "immediately");
        assert_eq!(spatial(7000.0), "");
        assert_eq!(spatial(12_000.0), "in the distance");
        assert_eq!(whole_meters(400.0), 1);
        assert_eq!(whole_meters(4600.0), 4);
    }
}
