//! Animation presets: entrance/scroll keyframes and hover effects.

use sk_core::Animation;

/// Entrance presets with keyframes. Anything else plays as `fadeIn`.
pub const ENTRANCE_PRESETS: [&str; 7] = [
    "fadeIn",
    "slideUp",
    "slideDown",
    "slideLeft",
    "slideRight",
    "zoomIn",
    "bounce",
];

/// The preset actually played for `preset`.
pub fn entrance_preset(preset: &str) -> &'static str {
    ENTRANCE_PRESETS
        .iter()
        .copied()
        .find(|p| *p == preset)
        .unwrap_or_else(|| {
            log::debug!("unknown entrance animation `{preset}`, using fadeIn");
            "fadeIn"
        })
}

pub fn keyframes_name(preset: &str) -> String {
    format!("sk-{}", entrance_preset(preset))
}

/// Keyframe stops for a preset, as `(selector, declarations)`.
pub fn keyframes(preset: &str) -> &'static [(&'static str, &'static str)] {
    match entrance_preset(preset) {
        "slideUp" => &[
            ("from", "opacity: 0; transform: translateY(40px);"),
            ("to", "opacity: 1; transform: translateY(0);"),
        ],
        "slideDown" => &[
            ("from", "opacity: 0; transform: translateY(-40px);"),
            ("to", "opacity: 1; transform: translateY(0);"),
        ],
        "slideLeft" => &[
            ("from", "opacity: 0; transform: translateX(40px);"),
            ("to", "opacity: 1; transform: translateX(0);"),
        ],
        "slideRight" => &[
            ("from", "opacity: 0; transform: translateX(-40px);"),
            ("to", "opacity: 1; transform: translateX(0);"),
        ],
        "zoomIn" => &[
            ("from", "opacity: 0; transform: scale(0.8);"),
            ("to", "opacity: 1; transform: scale(1);"),
        ],
        "bounce" => &[
            ("0%", "opacity: 0; transform: scale(0.3);"),
            ("50%", "opacity: 1; transform: scale(1.05);"),
            ("70%", "transform: scale(0.9);"),
            ("100%", "transform: scale(1);"),
        ],
        _ => &[("from", "opacity: 0;"), ("to", "opacity: 1;")],
    }
}

/// `animation` shorthand for an entrance or scroll animation.
pub fn animation_value(anim: &Animation) -> String {
    format!(
        "{} {}ms {} {}ms both",
        keyframes_name(&anim.preset),
        anim.duration,
        anim.easing,
        anim.delay
    )
}

/// Declarations for the `:hover` rule, or `None` for unknown presets.
pub fn hover_declarations(anim: &Animation) -> Option<Vec<(String, String)>> {
    let param = |key: &str| anim.params.get(key).and_then(|v| v.as_f64());
    let decls = match anim.preset.as_str() {
        "scale" => vec![(
            "transform".to_string(),
            format!("scale({})", param("scale").unwrap_or(1.05)),
        )],
        "lift" => vec![
            (
                "transform".to_string(),
                format!("translateY(-{}px)", param("distance").unwrap_or(4.0)),
            ),
            (
                "box-shadow".to_string(),
                "0 10px 20px rgba(0, 0, 0, 0.15)".to_string(),
            ),
        ],
        "glow" => vec![(
            "box-shadow".to_string(),
            "0 0 20px rgba(59, 130, 246, 0.6)".to_string(),
        )],
        "fade" => vec![(
            "opacity".to_string(),
            param("opacity").unwrap_or(0.7).to_string(),
        )],
        other => {
            log::debug!("unknown hover animation `{other}`, skipped");
            return None;
        }
    };
    Some(decls)
}

/// `transition` so hover effects ease in and out.
pub fn hover_transition(anim: &Animation) -> String {
    format!(
        "transform {d}ms {e}, box-shadow {d}ms {e}, opacity {d}ms {e}",
        d = anim.duration,
        e = anim.easing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn anim(value: serde_json::Value) -> Animation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unknown_entrance_falls_back() {
        assert_eq!(keyframes_name("spin"), "sk-fadeIn");
        assert_eq!(keyframes_name("bounce"), "sk-bounce");
        assert_eq!(keyframes("spin"), keyframes("fadeIn"));
    }

    #[test]
    fn shorthand_uses_defaults() {
        let a = anim(json!({ "type": "slideUp" }));
        assert_eq!(animation_value(&a), "sk-slideUp 600ms ease-out 0ms both");
    }

    #[test]
    fn hover_params() {
        let a = anim(json!({ "type": "scale", "scale": 1.2 }));
        assert_eq!(
            hover_declarations(&a),
            Some(vec![("transform".to_string(), "scale(1.2)".to_string())])
        );
        assert_eq!(hover_declarations(&anim(json!({ "type": "wobble" }))), None);
    }
}
