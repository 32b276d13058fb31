use super::*;

fn config() -> AdaptConfig {
    AdaptConfig::with_defaults().unwrap()
}

fn probe(user_agent: &str, width: f64, height: f64) -> DeviceProbe {
    DeviceProbe { user_agent: user_agent.into(), viewport: Viewport::new(width, height), ..DeviceProbe::default() }
}

const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/126.0";
const PHONE_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile";

// =============================================================
// Orientation
// =============================================================

#[test]
fn taller_viewport_is_portrait() {
    assert_eq!(Viewport::new(390.0, 844.0).orientation(), Orientation::Portrait);
    assert_eq!(Viewport::new(844.0, 390.0).orientation(), Orientation::Landscape);
}

#[test]
fn square_viewport_is_landscape() {
    assert_eq!(Viewport::new(500.0, 500.0).orientation(), Orientation::Landscape);
}

#[test]
fn orientation_strings() {
    assert_eq!(Orientation::Portrait.as_str(), "portrait");
    assert_eq!(Orientation::Landscape.as_str(), "landscape");
    assert_eq!(serde_json::to_string(&Orientation::Portrait).unwrap(), "\"portrait\"");
}

// =============================================================
// Detection
// =============================================================

#[test]
fn mobile_by_user_agent_even_when_wide() {
    let ui = UiState::detect(&probe(PHONE_UA, 1024.0, 768.0), &config());
    assert!(ui.mobile);
    assert_eq!(ui.orientation, Orientation::Landscape);
}

#[test]
fn mobile_by_width_on_desktop_agent() {
    assert!(UiState::detect(&probe(DESKTOP_UA, 768.0, 900.0), &config()).mobile);
    assert!(!UiState::detect(&probe(DESKTOP_UA, 1280.0, 800.0), &config()).mobile);
}

#[test]
fn touch_from_events_or_touch_points() {
    let mut p = probe(DESKTOP_UA, 1280.0, 800.0);
    assert!(!UiState::detect(&p, &config()).touch);
    p.max_touch_points = 5;
    assert!(UiState::detect(&p, &config()).touch);
    p.max_touch_points = 0;
    p.touch_events = true;
    assert!(UiState::detect(&p, &config()).touch);
}

#[test]
fn reduced_motion_is_carried() {
    let mut p = probe(DESKTOP_UA, 1280.0, 800.0);
    p.prefers_reduced_motion = true;
    assert!(UiState::detect(&p, &config()).reduced_motion);
}

#[test]
fn set_viewport_reports_orientation_flip() {
    let mut ui = UiState::detect(&probe(PHONE_UA, 390.0, 844.0), &config());
    assert_eq!(ui.orientation, Orientation::Portrait);
    assert!(!ui.set_viewport(Viewport::new(400.0, 844.0)));
    assert!(ui.set_viewport(Viewport::new(844.0, 400.0)));
    assert_eq!(ui.orientation, Orientation::Landscape);
    assert_eq!(ui.viewport, Viewport::new(844.0, 400.0));
}
