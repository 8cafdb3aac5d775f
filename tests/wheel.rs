mod tests {
    use rgb_floodlight::color::{BLUE, Color, GREEN, PRIMARY, RAINBOW, RED};
    use rgb_floodlight::wheel::{
        BlendWheel, BounceWheel, ColorWheel, EffectId, KeyframeError, Keyframes, SineWheel,
        WheelSlot, normalize_angle,
    };

    const EPSILON: f32 = 1e-3;

    fn assert_close(actual: Color, expected: Color) {
        assert!(
            (actual.r - expected.r).abs() < EPSILON
                && (actual.g - expected.g).abs() < EPSILON
                && (actual.b - expected.b).abs() < EPSILON,
            "{actual:?} != {expected:?}"
        );
    }

    fn red_green_red() -> Keyframes {
        Keyframes::new(&[RED, GREEN, RED]).unwrap()
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(370.0), 10.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(-720.0), 0.0);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
        assert_eq!(normalize_angle(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_keyframes_validation() {
        assert_eq!(Keyframes::new(&[]), Err(KeyframeError::Empty));
        assert_eq!(Keyframes::new(&[RED, GREEN]), Err(KeyframeError::OpenLoop));
        assert_eq!(Keyframes::new(&[RED; 17]), Err(KeyframeError::TooMany));
        assert_eq!(Keyframes::new(&[BLUE]).unwrap().len(), 1);
        assert_eq!(red_green_red().sections(), 2);
    }

    #[test]
    fn test_blend_scenario() {
        let wheel = BlendWheel::new(red_green_red());
        assert_eq!(wheel.color_at(90.0), Color::new(127.5, 127.5, 0.0));
        assert_eq!(wheel.color_at(180.0), GREEN);
        assert_eq!(wheel.color_at(0.0), RED);
        assert_eq!(wheel.color_at(360.0), RED);
    }

    #[test]
    fn test_blend_is_continuous_at_wrap() {
        let wheel = BlendWheel::new(Keyframes::new(&PRIMARY).unwrap());
        assert_eq!(wheel.color_at(0.0), PRIMARY[0]);
        assert_eq!(wheel.color_at(360.0), PRIMARY[0]);
        assert_close(wheel.color_at(359.9999), PRIMARY[0]);
        assert_close(wheel.color_at(-0.0001), PRIMARY[0]);
    }

    #[test]
    fn test_wheels_are_periodic() {
        let wheels = [
            WheelSlot::Blend(BlendWheel::new(Keyframes::new(&RAINBOW).unwrap())),
            WheelSlot::Bounce(BounceWheel::new(Keyframes::new(&RAINBOW).unwrap())),
            WheelSlot::Sine(SineWheel),
        ];
        for wheel in &wheels {
            for angle in [0.0_f32, 15.0, 45.0, 100.0, 200.0, 359.0] {
                let base = wheel.color_at(angle);
                for turns in [-2.0_f32, -1.0, 1.0, 3.0] {
                    assert_eq!(wheel.color_at(angle + 360.0 * turns), base);
                }
            }
        }
    }

    #[test]
    fn test_bounce_scenario() {
        let wheel = BounceWheel::new(red_green_red());
        assert_eq!(wheel.color_at(0.0), RED);
        let boundary = wheel.color_at(90.0);
        assert!(boundary.r.abs() < EPSILON && boundary.g.abs() < EPSILON);
        assert_close(wheel.color_at(180.0), GREEN);
        assert_close(wheel.color_at(270.0), Color::default());
        assert_close(wheel.color_at(360.0), RED);
    }

    #[test]
    fn test_bounce_intensity() {
        let wheel = BounceWheel::new(Keyframes::new(&PRIMARY).unwrap());
        // Six sections of 60°, centers on multiples of 60°
        assert!((wheel.intensity(0.0) - 1.0).abs() < EPSILON);
        assert!((wheel.intensity(120.0) - 1.0).abs() < EPSILON);
        assert!(wheel.intensity(30.0) < EPSILON);
        assert!(wheel.intensity(150.0) < EPSILON);
        assert_close(wheel.color_at(120.0), GREEN);
    }

    #[test]
    fn test_single_color_is_constant() {
        let color = Color::new(10.0, 20.0, 30.0);
        let wheel = EffectId::SingleColor.to_wheel(color);
        for angle in [-45.0_f32, 0.0, 33.3, 180.0, 359.9, 720.0] {
            assert_eq!(wheel.color_at(angle), color);
        }
        assert_eq!(WheelSlot::blend(Keyframes::single(BLUE)), WheelSlot::Single(BLUE));
    }

    #[test]
    fn test_single_color_bounce() {
        let color = Color::new(200.0, 100.0, 0.0);
        let wheel = EffectId::SingleColorBounce.to_wheel(color);
        // One section: full at 0°, dark at the 180° boundary
        assert_eq!(wheel.color_at(0.0), color);
        assert_close(wheel.color_at(90.0), color.scale(core::f32::consts::FRAC_1_SQRT_2));
        assert!(wheel.color_at(180.0).r < EPSILON);
        assert_close(wheel.color_at(360.0), color);
    }

    #[test]
    fn test_sine_wheel_primaries() {
        let wheel = SineWheel;
        assert_eq!(wheel.color_at(0.0), RED);
        assert_eq!(wheel.color_at(120.0), GREEN);
        assert_eq!(wheel.color_at(240.0), BLUE);
        let yellowish = wheel.color_at(60.0);
        assert!((yellowish.r - yellowish.g).abs() <= 1.0);
        assert_eq!(yellowish.b, 0.0);
    }

    #[test]
    fn test_effect_names_round_trip() {
        for effect in EffectId::ALL {
            assert_eq!(EffectId::parse_from_str(effect.as_str()), Some(effect));
        }
        assert_eq!(EffectId::parse_from_str("Primary Blend"), Some(EffectId::PrimaryBlend));
        assert_eq!(EffectId::parse_from_str("primary blend"), None);
        assert_eq!(EffectId::parse_from_str("Strobe"), None);
    }

    #[test]
    fn test_palette_effects_ignore_user_color() {
        let a = EffectId::RainbowBlend.to_wheel(RED);
        let b = EffectId::RainbowBlend.to_wheel(BLUE);
        assert_eq!(a, b);
        assert!(matches!(EffectId::Christmas.to_wheel(RED), WheelSlot::Bounce(_)));
        assert!(matches!(EffectId::HalloweenBlend.to_wheel(RED), WheelSlot::Blend(_)));
        assert!(matches!(EffectId::Sine.to_wheel(RED), WheelSlot::Sine(_)));
    }
}
