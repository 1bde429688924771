use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in Ease::ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn inputs_outside_unit_range_are_clamped() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(-0.2), 0.0);
        assert_eq!(ease.apply(1.7), 1.0);
    }
}

#[test]
fn in_out_quint_matches_reference_values() {
    let e = Ease::InOutQuint;
    assert!((e.apply(0.25) - 16.0 * 0.25f64.powi(5)).abs() < 1e-12);
    assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((e.apply(0.75) - (1.0 + 16.0 * (-0.25f64).powi(5))).abs() < 1e-12);
}

#[test]
fn names_round_trip_through_from_str() {
    for ease in Ease::ALL {
        assert_eq!(ease.name().parse::<Ease>().unwrap(), ease);
    }
}

#[test]
fn from_str_accepts_prefixed_and_snake_case() {
    assert_eq!("easeInOutQuint".parse::<Ease>().unwrap(), Ease::InOutQuint);
    assert_eq!("in_out_cubic".parse::<Ease>().unwrap(), Ease::InOutCubic);
    assert_eq!("linear".parse::<Ease>().unwrap(), Ease::Linear);
    assert!("bouncy".parse::<Ease>().is_err());
}

#[test]
fn closures_are_easing_strategies() {
    let f: EasingFn = Arc::new(|t: f64| t * t);
    assert_eq!(f.ease(0.5), 0.25);
    let g = Ease::Linear.into_fn();
    assert_eq!(g.ease(0.3), 0.3);
}
