use image::DynamicImage;
use qr_pro_renderer::{
    EcLevel, Generation, History, MAX_ENTRIES, MemoryStore, ModuleGrid, QrStudio, RenderConfig,
    Surface, render,
};

fn decode(surface: &Surface) -> Option<String> {
    let grey = DynamicImage::ImageRgba8(surface.to_rgba_image()).to_luma8();
    let (w, h) = (grey.width() as usize, grey.height() as usize);
    let mut img = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
        grey.get_pixel(x as u32, y as u32)[0]
    });
    let grids = img.detect_grids();
    let (_, content) = grids.first()?.decode().ok()?;
    Some(content)
}

#[test]
fn plain_render_scans_back_to_content() {
    let grid = ModuleGrid::encode_with_level("https://example.com", EcLevel::H).unwrap();
    let config = RenderConfig::default();
    assert!(config.is_plain());

    let surface = render(&grid, &config).unwrap();
    assert_eq!(surface.resolution(), 2048);
    assert_eq!(decode(&surface).as_deref(), Some("https://example.com"));
}

#[test]
fn studio_output_scans_and_exports() {
    let mut studio = QrStudio::new(MemoryStore::new());
    assert_eq!(
        studio.generate("https://example.com", false).unwrap(),
        Generation::Rendered
    );
    let surface = studio.surface().unwrap();
    assert_eq!(decode(surface).as_deref(), Some("https://example.com"));

    let png = surface.encode_png().unwrap();
    let reloaded = image::load_from_memory(&png).unwrap();
    assert_eq!((reloaded.width(), reloaded.height()), (2048, 2048));
}

#[test]
fn saving_twice_keeps_one_entry() {
    let mut studio = QrStudio::new(MemoryStore::new());
    studio.set_config(RenderConfig {
        resolution: 256,
        ..RenderConfig::default()
    });
    studio.generate("https://example.com", true).unwrap();
    studio.generate("https://example.com", true).unwrap();

    let entries = studio.history().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "https://example.com");
}

#[test]
fn eleven_saves_keep_ten_newest() {
    let mut history = History::new(MemoryStore::new());
    for i in 1..=11 {
        let content = format!("https://example.com/{i}");
        assert!(history.record(&content, &content, "url").unwrap());
    }

    let entries = history.entries().unwrap();
    assert_eq!(entries.len(), MAX_ENTRIES);
    assert_eq!(entries[0].content, "https://example.com/11");
    assert_eq!(entries[MAX_ENTRIES - 1].content, "https://example.com/2");
    assert!(entries.iter().all(|e| e.content != "https://example.com/1"));
}
