use softvg::{Color, Pixel, PixelFormat, Surface};

#[test]
fn color_to_pixel_round_trips_per_format() {
    let color = Color::rgba(200, 100, 50, 255);

    for format in [
        PixelFormat::Rgba,
        PixelFormat::Rgb,
        PixelFormat::Alpha8,
        PixelFormat::Alpha4,
        PixelFormat::Alpha2,
        PixelFormat::Alpha1,
    ] {
        let pixel = Pixel::from_color(color, format);
        assert_eq!(pixel.format(), format);

        // Requantizing an already-quantized pixel changes nothing.
        let again = Pixel::from_color(pixel.to_color(), format);
        assert_eq!(pixel, again);
    }
}

#[test]
fn opaque_alpha_quantizes_to_full_scale() {
    let opaque = Color::white();

    assert_eq!(Pixel::from_color(opaque, PixelFormat::Alpha8), Pixel::Alpha8(255));
    assert_eq!(Pixel::from_color(opaque, PixelFormat::Alpha4), Pixel::Alpha4(15));
    assert_eq!(Pixel::from_color(opaque, PixelFormat::Alpha2), Pixel::Alpha2(3));
    assert_eq!(Pixel::from_color(opaque, PixelFormat::Alpha1), Pixel::Alpha1(1));
}

#[test]
fn pixel_conversion_preserves_color_channels() {
    let rgba = Pixel::from_color(Color::rgba(10, 20, 30, 255), PixelFormat::Rgba);
    let rgb = rgba.convert(PixelFormat::Rgb);

    match rgb {
        Pixel::Rgb(p) => {
            assert_eq!((p.r, p.g, p.b), (10, 20, 30));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn surface_reports_its_shape() {
    for format in [
        PixelFormat::Rgba,
        PixelFormat::Rgb,
        PixelFormat::Alpha8,
        PixelFormat::Alpha4,
        PixelFormat::Alpha2,
        PixelFormat::Alpha1,
    ] {
        let surface = Surface::new(format, 17, 9);

        assert_eq!(surface.width(), 17);
        assert_eq!(surface.height(), 9);
        assert_eq!(surface.format(), format);
        assert_eq!(surface.get_pixel(0, 0), Some(Pixel::transparent(format)));
        assert_eq!(surface.get_pixel(17, 0), None);
        assert_eq!(surface.get_pixel(0, 9), None);
    }
}

#[test]
fn packed_formats_keep_neighbors_intact() {
    // Odd width so the last byte of each row is partially used.
    let mut surface = Surface::new(PixelFormat::Alpha4, 5, 3);

    surface.put_pixel(2, 1, Pixel::Alpha4(9)).unwrap();
    surface.put_pixel(3, 1, Pixel::Alpha4(5)).unwrap();

    assert_eq!(surface.get_pixel(2, 1), Some(Pixel::Alpha4(9)));
    assert_eq!(surface.get_pixel(3, 1), Some(Pixel::Alpha4(5)));
    assert_eq!(surface.get_pixel(1, 1), Some(Pixel::Alpha4(0)));
    assert_eq!(surface.get_pixel(4, 1), Some(Pixel::Alpha4(0)));
    assert_eq!(surface.get_pixel(2, 0), Some(Pixel::Alpha4(0)));
    assert_eq!(surface.get_pixel(2, 2), Some(Pixel::Alpha4(0)));

    let mut bits = Surface::new(PixelFormat::Alpha1, 9, 2);

    for x in (0..9).step_by(2) {
        bits.put_pixel(x, 0, Pixel::Alpha1(1)).unwrap();
    }

    for x in 0..9 {
        let expected = u8::from(x % 2 == 0);
        assert_eq!(bits.get_pixel(x, 0), Some(Pixel::Alpha1(expected)));
        assert_eq!(bits.get_pixel(x, 1), Some(Pixel::Alpha1(0)));
    }
}

#[test]
fn put_pixel_converts_foreign_formats() {
    let mut surface = Surface::new(PixelFormat::Alpha8, 4, 4);

    // An opaque color pixel lands as full coverage.
    surface
        .put_pixel(1, 1, Pixel::from_color(Color::rgb(9, 9, 9), PixelFormat::Rgba))
        .unwrap();

    assert_eq!(surface.get_pixel(1, 1), Some(Pixel::Alpha8(255)));
}

#[test]
fn out_of_bounds_put_is_ignored() {
    let mut surface = Surface::new(PixelFormat::Rgba, 4, 4);

    surface
        .put_pixel(100, 100, Pixel::from_color(Color::white(), PixelFormat::Rgba))
        .unwrap();

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(surface.get_pixel(x, y), Some(Pixel::transparent(PixelFormat::Rgba)));
        }
    }
}

#[test]
fn clear_fills_every_pixel() {
    let mut surface = Surface::new(PixelFormat::Rgb, 6, 5);
    let pixel = Pixel::from_color(Color::rgb(1, 2, 3), PixelFormat::Rgb);

    surface.clear(pixel).unwrap();

    for y in 0..5 {
        for x in 0..6 {
            assert_eq!(surface.get_pixel(x, y), Some(pixel));
        }
    }
}
