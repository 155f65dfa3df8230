use super::*;

const CANVAS: Canvas = Canvas::new(64, 48);

fn vert(x: f64, y: f64, color: Rgba8, uv: Point) -> ScreenVertex {
    ScreenVertex {
        pos: Point::new(x, y),
        z: 1.0,
        rhw: 1.0,
        color,
        uv,
    }
}

/// Two triangles covering the whole canvas.
fn quad(color: Rgba8) -> (Vec<ScreenVertex>, Vec<u16>) {
    let v = vec![
        vert(0.0, 0.0, color, Point::new(0.0, 0.0)),
        vert(64.0, 0.0, color, Point::new(1.0, 0.0)),
        vert(0.0, 48.0, color, Point::new(0.0, 1.0)),
        vert(64.0, 48.0, color, Point::new(1.0, 1.0)),
    ];
    (v, vec![0, 1, 2, 1, 3, 2])
}

fn fresh() -> CpuAdapter {
    let mut a = CpuAdapter::new(CANVAS, CANVAS);
    a.begin_frame().unwrap();
    a
}

#[test]
fn begin_frame_clears_to_opaque_black() {
    let a = fresh();
    assert_eq!(a.pixel(10, 10), Some(Rgba8::new(0, 0, 0, 255)));
    assert_eq!(a.pixel(64, 0), None);
}

#[test]
fn opaque_quad_covers_canvas() {
    let mut a = fresh();
    let (v, i) = quad(Rgba8::new(200, 100, 50, 255));
    a.bind_texture(None).unwrap();
    a.draw_triangles(&v, &i).unwrap();
    for (x, y) in [(0, 0), (63, 47), (32, 24)] {
        assert_eq!(a.pixel(x, y), Some(Rgba8::new(200, 100, 50, 255)));
    }
}

#[test]
fn complementary_layers_sum_to_full_coverage() {
    let mut a = fresh();
    let (v, i) = quad(Rgba8::new(255, 0, 0, 128));
    a.draw_triangles(&v, &i).unwrap();
    let (v, i) = quad(Rgba8::new(0, 0, 255, 127));
    a.draw_triangles(&v, &i).unwrap();
    let px = a.pixel(5, 5).unwrap();
    assert_eq!(px.a, 255);
    assert!(px.r > 0 && px.b > 0);
    assert_eq!(px.g, 0);
}

#[test]
fn texture_is_modulated_by_vertex_color() {
    let mut a = fresh();
    let mut tex = RgbaImage::new(2, 1);
    tex.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    tex.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    a.insert_texture(TextureId(3), tex);
    a.bind_texture(Some(TextureId(3))).unwrap();
    let (v, i) = quad(Rgba8::new(255, 255, 255, 255));
    a.draw_triangles(&v, &i).unwrap();
    assert_eq!(a.pixel(4, 20), Some(Rgba8::new(255, 0, 0, 255)));
    assert_eq!(a.pixel(60, 20), Some(Rgba8::new(0, 255, 0, 255)));
}

#[test]
fn unknown_texture_and_bad_index_are_errors() {
    let mut a = fresh();
    assert!(matches!(
        a.bind_texture(Some(TextureId(9))),
        Err(RenderError::UnknownTexture(TextureId(9)))
    ));
    let (v, _) = quad(Rgba8::WHITE);
    assert!(matches!(
        a.draw_triangles(&v, &[0, 1, 7]),
        Err(RenderError::Draw(_))
    ));
}

#[test]
fn culled_triangles_are_skipped() {
    let mut a = fresh();
    let (mut v, i) = quad(Rgba8::WHITE);
    for vx in &mut v {
        vx.rhw = 0.0;
    }
    a.draw_triangles(&v, &i).unwrap();
    assert_eq!(a.pixel(32, 24), Some(Rgba8::new(0, 0, 0, 255)));
}

#[test]
fn output_is_scaled_from_reference_space() {
    let mut a = CpuAdapter::new(Canvas::new(32, 24), CANVAS);
    a.begin_frame().unwrap();
    let v = vec![
        vert(0.0, 0.0, Rgba8::WHITE, Point::ORIGIN),
        vert(32.0, 0.0, Rgba8::WHITE, Point::ORIGIN),
        vert(0.0, 48.0, Rgba8::WHITE, Point::ORIGIN),
    ];
    a.draw_triangles(&v, &[0, 1, 2]).unwrap();
    assert_eq!(a.pixel(1, 1), Some(Rgba8::WHITE));
    assert_eq!(a.pixel(30, 22), Some(Rgba8::new(0, 0, 0, 255)));
}

#[test]
fn wireframe_draws_edges_only() {
    let mut a = fresh();
    let v = vec![
        vert(8.0, 8.0, Rgba8::new(0, 255, 0, 255), Point::ORIGIN),
        vert(40.0, 8.0, Rgba8::new(0, 255, 0, 255), Point::ORIGIN),
        vert(8.0, 40.0, Rgba8::new(0, 255, 0, 255), Point::ORIGIN),
    ];
    a.draw_wireframe(&v, &[0, 1, 2]).unwrap();
    assert_eq!(a.pixel(20, 8), Some(Rgba8::new(0, 255, 0, 255)));
    assert_eq!(a.pixel(14, 14), Some(Rgba8::new(0, 0, 0, 255)));
}

#[test]
fn wireframe_edges_far_off_target_are_clipped() {
    let mut a = fresh();
    let green = Rgba8::new(0, 255, 0, 255);
    let v = vec![
        vert(8.0, 8.0, green, Point::ORIGIN),
        vert(1.0e12, 8.0, green, Point::ORIGIN),
        vert(8.0, -1.0e12, green, Point::ORIGIN),
    ];
    a.draw_wireframe(&v, &[0, 1, 2]).unwrap();
    assert_eq!(a.pixel(40, 8), Some(green));
    assert_eq!(a.pixel(8, 4), Some(green));
}

#[test]
fn clip_segment_bounds_the_endpoints() {
    let (p, q) = clip_segment(Point::new(-100.0, 10.0), Point::new(100.0, 10.0), 64.0, 48.0)
        .unwrap();
    assert_eq!((p, q), (Point::new(0.0, 10.0), Point::new(64.0, 10.0)));

    let inside = (Point::new(2.0, 3.0), Point::new(5.0, 7.0));
    assert_eq!(clip_segment(inside.0, inside.1, 64.0, 48.0), Some(inside));

    assert!(clip_segment(Point::new(-5.0, -5.0), Point::new(-1.0, 80.0), 64.0, 48.0).is_none());
    assert!(clip_segment(Point::new(0.0, 0.0), Point::new(f64::NAN, 3.0), 64.0, 48.0).is_none());
}

#[test]
fn flash_blends_over_everything() {
    let mut a = fresh();
    a.draw_flash(&FlashQuad {
        color: Rgba8::WHITE,
        alpha: 1.0,
    })
    .unwrap();
    assert_eq!(a.pixel(0, 0), Some(Rgba8::WHITE));

    let mut a = fresh();
    a.draw_flash(&FlashQuad {
        color: Rgba8::WHITE,
        alpha: 0.0,
    })
    .unwrap();
    assert_eq!(a.pixel(0, 0), Some(Rgba8::new(0, 0, 0, 255)));
}

#[test]
fn wipe_hides_the_unrevealed_side() {
    let painted = || {
        let mut a = fresh().with_clear(Rgba8::new(0, 0, 0, 255));
        let (v, i) = quad(Rgba8::WHITE);
        a.draw_triangles(&v, &i).unwrap();
        a
    };

    let mut a = painted();
    a.draw_wipe(&WipeQuad {
        kind: WipeKind::Appear,
        progress: 0.5,
    })
    .unwrap();
    assert_eq!(a.pixel(10, 10), Some(Rgba8::WHITE));
    assert_eq!(a.pixel(50, 10), Some(Rgba8::new(0, 0, 0, 255)));

    let mut a = painted();
    a.draw_wipe(&WipeQuad {
        kind: WipeKind::AppearReverse,
        progress: 0.25,
    })
    .unwrap();
    assert_eq!(a.pixel(10, 10), Some(Rgba8::new(0, 0, 0, 255)));
    assert_eq!(a.pixel(60, 10), Some(Rgba8::WHITE));
}
