use super::*;
use crate::draw::FontSize;
use Color as C;

fn mkimage<const W: usize, const H: usize>(data: [[Color; W]; H]) -> Image {
    let data = data
        .into_iter()
        .flat_map(|row| row.into_iter())
        .flat_map(|col| col.0)
        .collect::<Vec<_>>();
    Image::from_rgba8(W as u32, H as u32, &data)
}

fn count(image: &Image, color: Color) -> usize {
    image
        .data()
        .chunks_exact(4)
        .filter(|px| *px == color.0)
        .count()
}

#[test]
fn get_set() {
    let mut image = mkimage([[C::WHITE, C::RED], [C::GREEN, C::BLUE]]);
    assert_eq!(image.get(1, 0), C::RED);
    assert_eq!(image.get(0, 1), C::GREEN);

    image.set(1, 1, C::BLACK);
    assert_eq!(image.get(1, 1), C::BLACK);
}

#[test]
fn blend_opaque_and_transparent() {
    let mut image = mkimage([[C::WHITE, C::WHITE]]);
    image.blend(0, 0, C::RED);
    image.blend(1, 0, C::NONE);
    assert_eq!(image.get(0, 0), C::RED);
    assert_eq!(image.get(1, 0), C::WHITE);
}

#[test]
fn blend_half_alpha() {
    let mut image = mkimage([[C::BLACK]]);
    image.blend(0, 0, C::WHITE.with_alpha(128));
    let px = image.get(0, 0);
    assert_eq!(px.a(), 255);
    assert!((127..=129).contains(&px.r()), "{px:?}");
    assert_eq!(px.r(), px.g());
    assert_eq!(px.g(), px.b());
}

#[test]
fn rect_bounds() {
    let a = Rect::from_top_left(0, 0, 10, 10);
    assert_eq!((a.right(), a.bottom()), (10, 10));
    assert!(a.contains(9, 9));
    assert!(!a.contains(-1, 0));
    assert!(!a.contains(10, 9));
    assert_eq!(a.grow(2), Rect::from_top_left(-2, -2, 14, 14));
}

#[test]
fn filled_rect_clips() {
    let mut image = Image::new(4, 4);
    draw::rect(&mut image, Rect::from_top_left(-2, -2, 4, 4))
        .color(C::GREEN)
        .filled();
    assert_eq!(count(&image, C::GREEN), 4);
    assert_eq!(image.get(1, 1), C::GREEN);
    assert_eq!(image.get(2, 2), C::NONE);
}

#[test]
fn outline_rect() {
    let mut image = Image::new(5, 5);
    let rect = image.rect();
    draw::rect(&mut image, rect).color(C::BLUE);
    assert_eq!(count(&image, C::BLUE), 16);
    assert_eq!(image.get(2, 2), C::NONE);
}

#[test]
fn marker_is_a_cross() {
    let mut image = Image::new(5, 5);
    draw::marker(&mut image, 2, 2).color(C::WHITE).size(3);
    assert_eq!(image.get(2, 2), C::WHITE);
    assert_eq!(image.get(1, 1), C::WHITE);
    assert_eq!(image.get(3, 1), C::WHITE);
    assert_eq!(image.get(2, 1), C::NONE);
}

#[test]
fn text_with_background_plate() {
    let mut image = Image::new(100, 40);
    assert_eq!(FontSize::Medium.line_height(), 13);

    draw::text(&mut image, 10, 10, "Reps")
        .align_left()
        .align_top()
        .font(FontSize::Medium)
        .color(C::WHITE)
        .background(C::BLUE, 2);

    // Plate corners are inside the padding, outside of any glyph.
    assert_eq!(image.get(8, 8), C::BLUE);
    assert_eq!(image.get(10 + 32 + 1, 10 + 13 + 1), C::BLUE);
    assert_eq!(image.get(7, 7), C::NONE);
    assert!(count(&image, C::WHITE) > 0);
}

#[test]
fn text_outside_image_is_ignored() {
    let mut image = Image::new(8, 8);
    draw::text(&mut image, 500, 500, "nothing to see").background(C::RED, 4);
    assert_eq!(count(&image, C::NONE), 64);
}

#[test]
fn save_and_load_png() {
    let dir = std::env::temp_dir().join(format!("formcheck-image-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("roundtrip.png");

    let image = mkimage([[C::RED, C::GREEN], [C::BLUE, C::WHITE.with_alpha(10)]]);
    image.save(&path).unwrap();
    let loaded = Image::load(&path).unwrap();
    assert_eq!(loaded, image);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unsupported_extension() {
    Image::new(1, 1).save("frame.bmp").unwrap_err();
    Image::load("frame.gif").unwrap_err();
}
