use bodyfat_core::measurement::{Measurement, UnitSystem};
use bodyfat_core::unit_conversion::{
    cm_to_feet_inches, feet_inches_to_cm, inches_to_cm, kg_to_lbs, lbs_to_kg,
};

#[test]
fn test_five_ten_is_177_8_cm() {
    let mut m = Measurement::new();
    m.toggle_system(UnitSystem::Imperial);
    m.set_height_feet_inches("5", "10");
    m.set_weight("170");

    let metric = m.to_metric();
    assert!((metric.height_cm - 177.8).abs() < 1e-9);
    assert!((metric.weight_kg - 77.11064).abs() < 1e-6);
    assert_eq!(metric.waist_cm, None);
}

#[test]
fn test_to_metric_keeps_full_precision() {
    let mut m = Measurement::new();
    m.toggle_system(UnitSystem::Imperial);
    m.set_height_feet_inches("5", "11.5");
    m.set_weight("180.3");
    m.set_waist("33.3");

    let metric = m.to_metric();
    assert_eq!(metric.height_cm, feet_inches_to_cm(5.0, 11.5));
    assert_eq!(metric.weight_kg, lbs_to_kg(180.3));
    assert_eq!(metric.waist_cm, Some(inches_to_cm(33.3)));
}

#[test]
fn test_unparseable_fields_coerce_to_zero() {
    let mut m = Measurement::new();
    m.set_height_cm("tall");
    m.set_weight("");
    m.set_waist("abc");

    let metric = m.to_metric();
    assert_eq!(metric.height_cm, 0.0);
    assert_eq!(metric.weight_kg, 0.0);
    // The field was filled in, so a (zero) waist is reported
    assert_eq!(metric.waist_cm, Some(0.0));
}

#[test]
fn test_toggle_twice_restores_entered_values() {
    let mut m = Measurement::new();
    m.set_height_cm("177");
    m.set_weight("80.5");
    m.set_waist("86");

    m.toggle_system(UnitSystem::Imperial);
    assert_eq!(m.fields().height_feet, "5");
    assert_eq!(m.fields().height_inches, "10");
    assert_eq!(m.fields().weight, "177.5");
    assert_eq!(m.fields().waist, "33.9");

    m.toggle_system(UnitSystem::Metric);
    let metric = m.to_metric();
    assert!((metric.height_cm - 177.0).abs() <= 0.1);
    assert!((metric.weight_kg - 80.5).abs() <= 0.1);
    assert!((metric.waist_cm.unwrap() - 86.0).abs() <= 0.1);
}

#[test]
fn test_round_trip_within_tolerance_for_weights() {
    for kg in [45.0, 62.3, 80.0, 99.9, 140.2] {
        let lbs = (kg_to_lbs(kg) * 10.0_f64).round() / 10.0;
        let back = (lbs_to_kg(lbs) * 10.0_f64).round() / 10.0;
        assert!((back - kg).abs() <= 0.1, "{} kg came back as {}", kg, back);
    }
}

#[test]
fn test_inches_carry_into_feet() {
    // 152.3 cm = 59.96 in -> 4 ft 11.96 in -> 5 ft 0 in
    assert_eq!(cm_to_feet_inches(152.3), (5, 0));
}

#[test]
fn test_toggle_to_same_system_is_noop() {
    let mut m = Measurement::new();
    m.set_height_cm("180");
    m.toggle_system(UnitSystem::Metric);
    assert_eq!(m.system(), UnitSystem::Metric);
    assert_eq!(m.fields().height_cm, "180");
}
