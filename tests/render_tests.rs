//! Integration tests for frame rasterization.

use mandala_viz::particles::{Particle, ParticleSimulator};
use mandala_viz::render::{FrameRenderer, RenderConfig};
use mandala_viz::themes::Theme;

fn particle(theta: f32, radius: f32, color: f32, size: f32) -> Particle {
    Particle {
        theta,
        radius,
        speed: 0.05,
        lifetime: 10,
        color,
        size,
        swirl: None,
    }
}

#[test]
fn test_background_only_has_ring_pixels() {
    let config = RenderConfig::default();
    let renderer = FrameRenderer::new(config.clone(), Theme::Agni.profile());
    let frame = renderer.render(&[], 0.0);

    assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(frame.get_pixel(320, 240).0, [0, 0, 0, 255]);

    let mut tinted = 0;
    for (x, y, pixel) in frame.enumerate_pixels() {
        if pixel.0[..3] == [0, 0, 0] {
            continue;
        }
        tinted += 1;
        let dx = x as f32 + 0.5 - 320.0;
        let dy = y as f32 + 0.5 - 240.0;
        let dist = (dx * dx + dy * dy).sqrt();
        let near_ring = config
            .ring_radii
            .iter()
            .any(|r| (dist - r * renderer.scale()).abs() <= 1.0);
        assert!(near_ring, "stray pixel at ({}, {})", x, y);
        // Purple at 10% over black.
        assert!(pixel.0[2] > pixel.0[0] && pixel.0[0] > pixel.0[1]);
    }
    assert!(tinted > 100);
}

#[test]
fn test_pulse_fills_center_with_theme_color() {
    let renderer = FrameRenderer::new(RenderConfig::default(), Theme::Agni.profile());
    let frame = renderer.render(&[], 1.0);

    // #FF4500 at alpha 0.6 over black.
    assert_eq!(frame.get_pixel(320, 240).0, [153, 41, 0, 255]);
    // Pulse radius 0.4 data units is 38.4 px; 50 px out is untouched.
    assert_eq!(frame.get_pixel(370, 240).0, [0, 0, 0, 255]);
}

#[test]
fn test_pulse_grows_with_intensity() {
    let renderer = FrameRenderer::new(RenderConfig::default(), Theme::Indra.profile());
    let lit = |intensity: f32| {
        renderer
            .render(&[], intensity)
            .pixels()
            .filter(|p| p.0[0] > 100)
            .count()
    };
    let small = lit(0.2);
    let large = lit(0.8);
    assert!(small > 0);
    assert!(large > small * 10, "{} vs {}", large, small);
}

#[test]
fn test_particle_marker_lands_at_polar_position() {
    let renderer = FrameRenderer::new(RenderConfig::default(), Theme::Agni.profile());
    let p = particle(0.0, 0.75, 1.0, 100.0);
    let frame = renderer.render(&[p], 0.0);

    let (x, y) = renderer.to_pixel(0.0, 0.75);
    assert!((x - 392.0).abs() < 1e-3 && (y - 240.0).abs() < 1e-3);
    // Darkest OrRd entry #7F0000 at alpha 0.8.
    assert_eq!(frame.get_pixel(392, 240).0, [102, 0, 0, 255]);
    // Opposite side stays dark.
    assert_eq!(frame.get_pixel(248, 240).0, [0, 0, 0, 255]);
}

#[test]
fn test_particles_outside_plot_are_clipped() {
    let renderer = FrameRenderer::new(RenderConfig::default(), Theme::Vayu.profile());
    let empty = renderer.render(&[], 0.0);
    let outside = renderer.render(&[particle(0.3, 3.0, 0.9, 200.0)], 0.0);
    assert_eq!(empty, outside);
}

#[test]
fn test_later_particles_draw_over_earlier_ones() {
    let renderer = FrameRenderer::new(RenderConfig::default(), Theme::Agni.profile());
    let dark = particle(0.0, 0.75, 1.0, 100.0);
    let light = particle(0.0, 0.75, 0.0, 100.0);

    let a = renderer.render(&[dark.clone(), light.clone()], 0.0);
    let b = renderer.render(&[light, dark], 0.0);
    assert_ne!(a.get_pixel(392, 240), b.get_pixel(392, 240));
}

#[test]
fn test_simulated_burst_is_visible() {
    let profile = Theme::Indra.profile();
    let renderer = FrameRenderer::new(RenderConfig::default(), profile.clone());
    let mut sim = ParticleSimulator::with_seed(profile, 3);
    let background = renderer.render(&[], 0.0);

    sim.step(1.0);
    for _ in 0..5 {
        sim.step(0.0);
    }
    let frame = renderer.render(sim.particles(), 0.0);
    let changed = frame
        .pixels()
        .zip(background.pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert!(changed > 0);
}
