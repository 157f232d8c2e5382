use mousecross::model::Rgb;
use mousecross::{clamp, finite_or};

#[test]
fn clamp_keeps_inner_value() {
    assert_eq!(clamp(10.0, 0.0, 20.0), 10.0);
}

#[test]
fn clamp_limits_low_and_high() {
    assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
    assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
}

#[test]
fn finite_or_passes_finite_values() {
    assert_eq!(finite_or(3.5, 1.0), 3.5);
    assert_eq!(finite_or(-0.0, 1.0), -0.0);
}

#[test]
fn finite_or_replaces_nan_and_infinity() {
    assert_eq!(finite_or(f64::NAN, 1.0), 1.0);
    assert_eq!(finite_or(f64::INFINITY, 2.0), 2.0);
    assert_eq!(finite_or(f64::NEG_INFINITY, 3.0), 3.0);
}

#[test]
fn rgb_to_hex() {
    assert_eq!(Rgb::new(255, 0, 128).to_string(), "#FF0080");
}

#[test]
fn parse_hex_rgb() {
    let c: Rgb = "#FF0080".parse().expect("valid rgb hex");
    assert_eq!(c, Rgb::new(255, 0, 128));
}

#[test]
fn parse_hex_trims_and_ignores_case() {
    let c: Rgb = "  ff00Ff  ".parse().expect("valid with whitespace and mixed case");
    assert_eq!(c, Rgb::new(255, 0, 255));
}

#[test]
fn parse_hex_rejects_alpha_suffix() {
    assert!("#33669980".parse::<Rgb>().is_err());
}

#[test]
fn rgb_normalised_floats() {
    let (r, g, b) = Rgb::new(255, 0, 51).to_f64();
    assert_eq!((r, g, b), (1.0, 0.0, 0.2));
}
