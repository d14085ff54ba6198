//! Unit tests for rg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, NodeKey};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(usize::from(id), 42);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn key_from_osm_id() {
        assert_eq!(NodeKey::from(61234567_i64).as_str(), "61234567");
        assert_eq!(NodeKey::from(-5_i64).to_string(), "-5");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(42.2808, -83.7430);
        assert_eq!(p.distance_miles(p), 0.0);
    }

    #[test]
    fn symmetric() {
        let pairs = [
            (GeoPoint::new(42.2808, -83.7430), GeoPoint::new(42.2794, -83.7325)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)),
            (GeoPoint::new(-33.86, 151.21), GeoPoint::new(51.50, -0.12)),
        ];
        for (a, b) in pairs {
            let ab = a.distance_miles(b);
            let ba = b.distance_miles(a);
            assert!((ab - ba).abs() < 1e-9, "{a} {b}: {ab} vs {ba}");
        }
    }

    #[test]
    fn ann_arbor_reference_points() {
        let a = GeoPoint::new(42.2808, -83.7430);
        let b = GeoPoint::new(42.2794, -83.7325);
        let d = a.distance_miles(b);
        assert!((d - 0.54).abs() <= 0.02, "got {d}");
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // 2πR / 360 with R = 3958.8 mi
        let d = GeoPoint::new(0.0, 0.0).distance_miles(GeoPoint::new(0.0, 1.0));
        assert!((d - 69.093).abs() < 0.01, "got {d}");
    }

    #[test]
    fn custom_radius_scales_linearly() {
        let a = GeoPoint::new(10.0, 10.0);
        let b = GeoPoint::new(11.0, 12.0);
        let miles = a.distance_miles(b);
        let doubled = a.distance_on_sphere(b, 2.0 * crate::EARTH_RADIUS_MILES);
        assert!((doubled - 2.0 * miles).abs() < 1e-9);
    }

    #[test]
    fn nan_propagates() {
        let d = GeoPoint::new(f64::NAN, 0.0).distance_miles(GeoPoint::new(1.0, 1.0));
        assert!(d.is_nan());
    }
}

#[cfg(test)]
mod config {
    use std::io::Write;

    use crate::{CoreError, RoadConfig};

    #[test]
    fn defaults_cover_every_drivable_class() {
        let c = RoadConfig::default();
        assert_eq!(c.drivable_classes.len(), 14);
        for class in &c.drivable_classes {
            assert!(c.default_speed_mph(class).is_some(), "{class} has no default");
        }
        assert_eq!(c.default_speed_mph("primary"), Some(60.0));
        assert_eq!(c.default_speed_mph("unclassified"), Some(55.0));
        assert_eq!(c.default_speed_mph("footway"), None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn oneway_values() {
        let c = RoadConfig::default();
        assert!(c.is_oneway_value("yes"));
        assert!(c.is_oneway_value("true"));
        assert!(c.is_oneway_value("1"));
        assert!(!c.is_oneway_value("no"));
        assert!(!c.is_oneway_value("-1"));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(RoadConfig::from_toml_str("").unwrap(), RoadConfig::default());
    }

    #[test]
    fn toml_overrides_tables() {
        let c = RoadConfig::from_toml_str(
            r#"
            earth_radius_miles = 3959.0
            drivable_classes = ["track"]

            [default_speeds_mph]
            track = 10
            "#,
        )
        .unwrap();
        assert_eq!(c.earth_radius_miles, 3959.0);
        assert!(c.is_drivable("track"));
        assert!(!c.is_drivable("primary"));
        assert_eq!(c.default_speed_mph("track"), Some(10.0));
        // Untouched fields keep their defaults.
        assert_eq!(c.class_tag, "highway");
    }

    #[test]
    fn unknown_field_rejected() {
        let err = RoadConfig::from_toml_str("radius = 1.0").unwrap_err();
        assert!(matches!(err, CoreError::Toml(_)));
    }

    #[test]
    fn non_positive_speed_rejected() {
        let err = RoadConfig::from_toml_str("[default_speeds_mph]\nprimary = 0").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)), "{err}");
    }

    #[test]
    fn non_positive_radius_rejected() {
        let err = RoadConfig::from_toml_str("earth_radius_miles = -1.0").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)), "{err}");
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "oneway_values = [\"yes\"]").unwrap();
        let c = RoadConfig::load(f.path()).unwrap();
        assert_eq!(c.oneway_values, ["yes"]);
    }
}
