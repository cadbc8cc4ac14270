//! End-to-end scenarios through the public API.

use std::io::Cursor;

use adsynth::codec::decode_raster;
use adsynth::compose::CompositeConfig;
use adsynth::types::{FocalStyle, PopupStyle};
use adsynth::{
    composite, darken, extract_palette, render_canvas, smart_crop, BuiltinTemplates,
    CeilingStatus, Colour, ColourScheme, CompositeJob, Compositor, CompressionConfig,
    FsAssetStore, Layout, Manifest, MemoryAssetStore, Region, Source, TemplateGeometry,
    Visibility,
};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

const W: u32 = 1126;
const H: u32 = 2436;

fn png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn blue_source() -> Vec<u8> {
    png(&RgbaImage::from_pixel(1000, 1000, Rgba([0, 0, 255, 255])))
}

fn noise(width: u32, height: u32) -> RgbaImage {
    let mut seed = 0x9E37_79B9_u32;
    RgbaImage::from_fn(width, height, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let [a, b, c, _] = seed.to_le_bytes();
        Rgba([a, b, c, 255])
    })
}

fn scheme() -> ColourScheme {
    ColourScheme::new(
        "#3366FF".parse::<Colour>().unwrap(),
        "#001A80".parse::<Colour>().unwrap(),
    )
}

/// Status bar and footer strip, transparent elsewhere.
fn top_art() -> RgbaImage {
    RgbaImage::from_fn(W, H, |x, y| {
        if y < 60 {
            Rgba([12, 12, 12, 255])
        } else if y >= 2300 {
            Rgba([250, (x % 200) as u8, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Opaque card behind the lower half.
fn base_art() -> RgbaImage {
    RgbaImage::from_fn(W, H, |_, y| {
        if y >= 1300 {
            Rgba([240, 240, 240, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Square icon shape.
fn icon_mask() -> RgbaImage {
    RgbaImage::from_fn(W, H, |x, y| {
        let inside = (80..240).contains(&x) && (1900..2060).contains(&y);
        Rgba([0, 0, 0, if inside { 255 } else { 0 }])
    })
}

fn focal_store() -> MemoryAssetStore {
    MemoryAssetStore::new()
        .with("focal-window/base.png", png(&base_art()))
        .with("focal-window/top.png", png(&top_art()))
        .with("focal-window/icon_mask.png", png(&icon_mask()))
}

fn focal_job() -> CompositeJob {
    let template = BuiltinTemplates::get("mt-f-1").unwrap();
    assert_eq!(template.layout, Layout::FocalWindow(FocalStyle::Standard));
    CompositeJob::new(Source::Raster(blue_source()), template, scheme()).with_visibility(Visibility::ALL)
}

#[test]
fn focal_window_standard_scenario() {
    let store = focal_store();
    let job = focal_job();

    let source = decode_raster(&blue_source(), "source").unwrap();
    let canvas = render_canvas(&source, &job, &store).unwrap();
    assert_eq!(canvas.dimensions(), (W, H));

    // foreground art is untouched wherever it is opaque
    let top = top_art();
    for (x, y, px) in top.enumerate_pixels() {
        if px.0[3] == 255 {
            assert_eq!(canvas.get_pixel(x, y), px, "top art altered at ({x}, {y})");
        }
    }

    // icon shape is solid icon colour
    for y in 1900..2060 {
        for x in 80..240 {
            assert_eq!(canvas.get_pixel(x, y).0, [0x33, 0x66, 0xFF, 255]);
        }
    }

    // source sits top-aligned at full width under the art
    let p = canvas.get_pixel(563, 500).0;
    assert!(p[0] < 5 && p[1] < 5 && p[2] > 250, "{:?}", p);

    let asset = composite(&job, &store).unwrap();
    assert_eq!((asset.width, asset.height), (W, H));
    assert_eq!(asset.format.mime(), "image/jpeg");
    assert_eq!(asset.ceiling, CeilingStatus::Met);
    assert!(asset.size() <= 200 * 1024);
    assert_eq!(decode_raster(&asset.bytes, "output").unwrap().dimensions(), (W, H));
}

#[test]
fn composite_is_deterministic() {
    let store = focal_store();
    let job = focal_job();
    let a = composite(&job, &store).unwrap();
    let b = composite(&job, &store).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn strict_dominance_bottom_colour() {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(400, 500, |x, y| {
        if y >= 400 {
            Rgba([0xFF, 0xAA, 0x00, 255])
        } else {
            Rgba([(x % 256) as u8, (y % 256) as u8, 160, 255])
        }
    }));

    let schemes = extract_palette(&image, 0.2, true);
    assert_eq!(schemes.len(), 5);
    let expected = darken(Colour::rgb(0xFF, 0xAA, 0x00), 2.5);
    assert_eq!(expected, Colour::rgb(102, 68, 0));
    assert_eq!(schemes[0].gradient, expected);
}

#[test]
fn composite_reports_unreachable_ceiling() {
    let store = MemoryAssetStore::new();
    let template = TemplateGeometry::new("noise-card", 512, 512, Layout::Popup(PopupStyle::Plain));
    let job = CompositeJob::new(Source::Raster(png(&noise(512, 512))), template, scheme());

    let compositor = Compositor::new(&store).with_config(CompositeConfig {
        ceiling_kb: 1,
        ..Default::default()
    });
    let asset = compositor.composite(&job).unwrap();
    assert_eq!(asset.ceiling, CeilingStatus::NotMet { ceiling: 1024 });
    assert!(asset.size() > 1024);
    assert!(asset.require_ceiling().is_err());
}

#[test]
fn smart_crop_hits_exact_size_around_region() {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(1600, 900, |x, _| {
        if x >= 1200 {
            Rgba([220, 30, 30, 255])
        } else {
            Rgba([30, 30, 220, 255])
        }
    }));
    let region: Region = "100,800,900,1000".parse().unwrap();

    let asset = smart_crop(&image, 300, 400, 200 * 1024, Some(&region), &CompressionConfig::default()).unwrap();
    assert_eq!((asset.width, asset.height), (300, 400));
    assert_eq!(asset.ceiling, CeilingStatus::Met);

    // the window is pushed against the right edge, so the output is mostly red
    let out = decode_raster(&asset.bytes, "crop").unwrap().to_rgba8();
    let p = out.get_pixel(280, 200).0;
    assert!(p[0] > 150 && p[2] < 100, "{:?}", p);
}

#[test]
fn project_directory_drives_compositing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("adsynth.yaml"),
        "assets: art\ncomposite:\n  ceiling_kb: 300\n",
    )
    .unwrap();
    let art = dir.path().join("art/focal-window");
    std::fs::create_dir_all(&art).unwrap();
    std::fs::write(art.join("top.png"), png(&top_art())).unwrap();
    std::fs::write(art.join("icon_mask.png"), png(&icon_mask())).unwrap();

    let (manifest, found) = Manifest::discover(dir.path()).unwrap();
    assert!(found);
    let store: FsAssetStore = manifest.asset_store(dir.path());
    let compositor = Compositor::new(&store).with_config(manifest.composite.clone());

    let job = CompositeJob::new(
        Source::Raster(blue_source()),
        manifest.template("mt-f-2").unwrap(),
        scheme(),
    );
    let source = decode_raster(&blue_source(), "source").unwrap();
    let canvas = compositor.render_canvas(&source, &job).unwrap();
    assert_eq!(canvas.get_pixel(100, 1950).0, [0x33, 0x66, 0xFF, 255]);
    assert_eq!(canvas.get_pixel(10, 10).0, [12, 12, 12, 255]);

    let asset = compositor.composite(&job).unwrap();
    assert!(asset.ceiling_met());
}
