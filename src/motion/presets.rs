//! Built-in motion presets.
//!
//! The site's whole motion vocabulary: soft fade-ups for copy, staggered
//! containers for grids and lists, horizontal slides for section labels,
//! and the overlay menu's panel/item/image choreography. Every preset uses
//! the site curve unless noted.

use super::easing::Easing;
use super::variant::{MotionState, VariantSpec};

const fn fade() -> (MotionState, MotionState) {
    (MotionState::new().opacity(0.0), MotionState::new().opacity(1.0))
}

fn timed(name: &str, rest: MotionState, active: MotionState, duration_ms: u64) -> VariantSpec {
    VariantSpec::builder(name)
        .rest(rest)
        .active(active)
        .duration_ms(duration_ms)
        .easing(Easing::site())
        .finish()
}

// =============================================================================
// Section reveals
// =============================================================================

/// Copy block rising 30px into place.
pub fn fade_up() -> VariantSpec {
    timed(
        "fade-up",
        MotionState::new().opacity(0.0).y(30.0),
        MotionState::new().opacity(1.0).y(0.0),
        600,
    )
}

/// Section headline: a slightly longer rise.
pub fn headline() -> VariantSpec {
    timed(
        "headline",
        MotionState::new().opacity(0.0).y(30.0),
        MotionState::new().opacity(1.0).y(0.0),
        700,
    )
}

/// Parent of a staggered list: fades itself and spaces children 100ms
/// apart after a 200ms lead-in.
pub fn stagger_container() -> VariantSpec {
    let (rest, active) = fade();
    VariantSpec::builder("stagger-container")
        .rest(rest)
        .active(active)
        .stagger_ms(100)
        .child_delay_ms(200)
        .finish()
}

/// Grid card rising 40px.
pub fn card() -> VariantSpec {
    timed(
        "card",
        MotionState::new().opacity(0.0).y(40.0),
        MotionState::new().opacity(1.0).y(0.0),
        600,
    )
}

/// Carousel card sliding in from the right.
pub fn testimonial_card() -> VariantSpec {
    timed(
        "testimonial-card",
        MotionState::new().opacity(0.0).x(30.0),
        MotionState::new().opacity(1.0).x(0.0),
        600,
    )
}

/// Section label entering from the left.
pub fn slide_in_left() -> VariantSpec {
    timed(
        "slide-in-left",
        MotionState::new().opacity(0.0).x(-20.0),
        MotionState::new().opacity(1.0).x(0.0),
        500,
    )
}

/// Section number entering from the right.
pub fn slide_in_right() -> VariantSpec {
    timed(
        "slide-in-right",
        MotionState::new().opacity(0.0).x(20.0),
        MotionState::new().opacity(1.0).x(0.0),
        500,
    )
}

/// Section description trailing its headline by 100ms.
pub fn fade_up_delayed() -> VariantSpec {
    VariantSpec::builder("fade-up-delayed")
        .rest(MotionState::new().opacity(0.0).y(30.0))
        .active(MotionState::new().opacity(1.0).y(0.0))
        .duration_ms(600)
        .delay_ms(100)
        .easing(Easing::site())
        .finish()
}

/// Section number trailing the description.
pub fn slide_in_right_delayed() -> VariantSpec {
    VariantSpec::builder("slide-in-right-delayed")
        .rest(MotionState::new().opacity(0.0).x(20.0))
        .active(MotionState::new().opacity(1.0).x(0.0))
        .duration_ms(500)
        .delay_ms(200)
        .finish()
}

/// Client logo in the hero strip.
pub fn logo_item() -> VariantSpec {
    timed(
        "logo-item",
        MotionState::new().opacity(0.0).y(10.0),
        MotionState::new().opacity(1.0).y(0.0),
        400,
    )
}

/// One character of the footer brand line.
pub fn letter() -> VariantSpec {
    timed(
        "letter",
        MotionState::new().opacity(0.0).y(50.0),
        MotionState::new().opacity(1.0).y(0.0),
        500,
    )
}

/// Container for the letter-by-letter brand line. Same rhythm as a grid.
pub fn letter_container() -> VariantSpec {
    let (rest, active) = fade();
    VariantSpec::builder("letter-container")
        .rest(rest)
        .active(active)
        .stagger_ms(100)
        .child_delay_ms(200)
        .finish()
}

/// Pricing feature bullet. Replayed on every package change.
pub fn feature_item() -> VariantSpec {
    timed(
        "feature-item",
        MotionState::new().opacity(0.0).x(-10.0),
        MotionState::new().opacity(1.0).x(0.0),
        300,
    )
}

/// Container for the pricing feature list: 50ms between bullets, no
/// lead-in.
pub fn feature_list() -> VariantSpec {
    let (rest, active) = fade();
    VariantSpec::builder("feature-list")
        .rest(rest)
        .active(active)
        .stagger_ms(50)
        .child_delay_ms(0)
        .finish()
}

// =============================================================================
// Navbar and overlay menu
// =============================================================================

/// Fixed header dropping in on first paint.
pub fn header_drop() -> VariantSpec {
    timed(
        "header-drop",
        MotionState::new().opacity(0.0).y(-100.0),
        MotionState::new().opacity(1.0).y(0.0),
        600,
    )
}

/// Full-screen overlay fade-in.
pub fn menu_panel() -> VariantSpec {
    let (rest, active) = fade();
    timed("menu-panel", rest, active, 400)
}

/// Overlay fade-out. Shorter than the way in.
pub fn menu_panel_exit() -> VariantSpec {
    let (rest, active) = fade();
    timed("menu-panel-exit", active, rest, 300)
}

/// Menu link list: 80ms between links after a 200ms lead-in.
pub fn menu_stagger() -> VariantSpec {
    let (rest, active) = fade();
    VariantSpec::builder("menu-stagger")
        .rest(rest)
        .active(active)
        .stagger_ms(80)
        .child_delay_ms(200)
        .finish()
}

pub fn menu_item() -> VariantSpec {
    timed(
        "menu-item",
        MotionState::new().opacity(0.0).y(20.0),
        MotionState::new().opacity(1.0).y(0.0),
        400,
    )
}

/// Featured image in the open menu: settles from 95% scale after the
/// links have started.
pub fn menu_image() -> VariantSpec {
    VariantSpec::builder("menu-image")
        .rest(MotionState::new().opacity(0.0).scale(0.95))
        .active(MotionState::new().opacity(1.0).scale(1.0))
        .duration_ms(500)
        .delay_ms(300)
        .easing(Easing::site())
        .finish()
}

/// Contact and social block at the foot of the open menu. Arrives last.
pub fn menu_footer() -> VariantSpec {
    VariantSpec::builder("menu-footer")
        .rest(MotionState::new().opacity(0.0).y(20.0))
        .active(MotionState::new().opacity(1.0).y(0.0))
        .duration_ms(400)
        .delay_ms(500)
        .finish()
}

/// Toggle icon swap (plus <-> close).
pub fn icon_swap() -> VariantSpec {
    VariantSpec::builder("icon-swap")
        .rest(MotionState::new().opacity(0.0).rotate(-90.0))
        .active(MotionState::new().opacity(1.0).rotate(0.0))
        .duration_ms(200)
        .easing(Easing::EaseOut)
        .finish()
}

// =============================================================================
// Lookup
// =============================================================================

/// Get a preset by name.
pub fn get_preset(name: &str) -> Option<VariantSpec> {
    let spec = match name {
        "fade-up" => fade_up(),
        "headline" => headline(),
        "stagger-container" => stagger_container(),
        "card" => card(),
        "testimonial-card" => testimonial_card(),
        "slide-in-left" => slide_in_left(),
        "slide-in-right" => slide_in_right(),
        "fade-up-delayed" => fade_up_delayed(),
        "slide-in-right-delayed" => slide_in_right_delayed(),
        "logo-item" => logo_item(),
        "letter" => letter(),
        "letter-container" => letter_container(),
        "feature-item" => feature_item(),
        "feature-list" => feature_list(),
        "header-drop" => header_drop(),
        "menu-panel" => menu_panel(),
        "menu-panel-exit" => menu_panel_exit(),
        "menu-stagger" => menu_stagger(),
        "menu-item" => menu_item(),
        "menu-image" => menu_image(),
        "menu-footer" => menu_footer(),
        "icon-swap" => icon_swap(),
        _ => return None,
    };
    Some(spec)
}

/// All preset names.
pub fn preset_names() -> &'static [&'static str] {
    &[
        "fade-up",
        "headline",
        "stagger-container",
        "card",
        "testimonial-card",
        "slide-in-left",
        "slide-in-right",
        "fade-up-delayed",
        "slide-in-right-delayed",
        "logo-item",
        "letter",
        "letter-container",
        "feature-item",
        "feature-list",
        "header-drop",
        "menu-panel",
        "menu-panel-exit",
        "menu-stagger",
        "menu-item",
        "menu-image",
        "menu-footer",
        "icon-swap",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_validates() {
        for name in preset_names() {
            let spec = get_preset(name).unwrap_or_else(|| panic!("missing preset {name}"));
            assert_eq!(spec.name(), *name);
            spec.validate().unwrap_or_else(|e| panic!("preset {name} invalid: {e}"));
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(get_preset("wobble").is_none());
    }

    #[test]
    fn test_menu_timings_differ() {
        assert_eq!(menu_panel().duration_ms(), 400);
        assert_eq!(menu_panel_exit().duration_ms(), 300);
    }

    #[test]
    fn test_trailing_copy_delays() {
        assert_eq!(fade_up_delayed().delay_ms(), 100);
        assert_eq!(slide_in_right_delayed().delay_ms(), 200);
        assert_eq!(menu_footer().delay_ms(), 500);
        assert_eq!(fade_up_delayed().active(), fade_up().active());
    }

    #[test]
    fn test_stagger_container_offsets() {
        let spec = stagger_container();
        assert_eq!(spec.child_offset_ms(0), 200);
        assert_eq!(spec.child_offset_ms(2), 400);
    }
}
