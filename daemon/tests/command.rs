mod tests {
    use rgb_floodlight::{EffectId, LightState, Rgb};
    use rgb_floodlight_daemon::command::{StatePayload, parse_command};
    use rgb_floodlight_daemon::error::CommandError;

    #[test]
    fn test_parse_full_command() {
        let payload = br#"{
            "brightness": 128,
            "color": {"r": 10, "g": 20, "b": 30},
            "effect": "Rainbow Blend",
            "state": "OFF",
            "transition": 60
        }"#;
        let intent = parse_command(payload).unwrap();
        assert_eq!(intent.brightness, Some(128));
        assert_eq!(intent.color, Some(Rgb::new(10, 20, 30)));
        assert_eq!(intent.effect, Some(EffectId::RainbowBlend));
        assert_eq!(intent.power, Some(false));
        assert_eq!(intent.transition, Some(60));
    }

    #[test]
    fn test_parse_partial_command() {
        let intent = parse_command(br#"{"state": "on"}"#).unwrap();
        assert_eq!(intent.power, Some(true));
        assert!(intent.brightness.is_none());
        assert!(intent.effect.is_none());

        let intent = parse_command(br#"{"color_mode": "rgb"}"#).unwrap();
        assert!(intent.is_empty());
    }

    #[test]
    fn test_numbers_are_clamped() {
        let intent = parse_command(br#"{"brightness": 300, "transition": 2.6}"#).unwrap();
        assert_eq!(intent.brightness, Some(255));
        assert_eq!(intent.transition, Some(3));

        let intent = parse_command(br#"{"color": {"r": -5, "g": 0, "b": 999}}"#).unwrap();
        assert_eq!(intent.color, Some(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn test_unknown_effect_is_rejected() {
        let err = parse_command(br#"{"effect": "Disco"}"#).unwrap_err();
        assert!(matches!(err, CommandError::UnknownEffect(ref name) if name == "Disco"));
        assert_eq!(
            err.to_string(),
            "commanded effect 'Disco' is not a valid effect"
        );
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            parse_command(b"not json"),
            Err(CommandError::Malformed(_))
        ));
        assert!(matches!(
            parse_command(br#"{"brightness": "bright"}"#),
            Err(CommandError::Malformed(_))
        ));
    }

    #[test]
    fn test_state_payload_document() {
        let state = LightState::default();
        let payload = StatePayload::from(&state);
        assert_eq!(
            payload.to_json(),
            r#"{"brightness":255,"color":{"r":255,"g":0,"b":255},"effect":"Primary Blend","state":"ON","transition":120}"#
        );

        let off = LightState {
            power: false,
            ..state
        };
        assert_eq!(StatePayload::from(&off).state, "OFF");
    }
}
