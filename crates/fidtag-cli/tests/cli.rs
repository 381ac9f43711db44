use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::Path;

use fidtag_family::{builtins, render_tag};

fn fidtag() -> Command {
    Command::cargo_bin("fidtag").expect("binary under test")
}

fn save_rendered_tag(id: u32, path: &Path) -> (u32, u32) {
    let gray = render_tag(&builtins::tag16h5(), id, 16, 32).expect("render tag");
    let view = gray.as_view();
    let img = RgbImage::from_fn(gray.width as u32, gray.height as u32, |x, y| {
        let v = view.get(x as i32, y as i32);
        Rgb([v, v, v])
    });
    img.save(path).expect("write fixture");
    (gray.width as u32, gray.height as u32)
}

#[test]
fn missing_argument_prints_usage_and_fails() {
    fidtag()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn nonexistent_input_reports_the_path() {
    fidtag()
        .arg("/no/such/image.png")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("/no/such/image.png"));
}

#[test]
fn blank_image_reports_zero_tags_and_copies_pixels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("blank.png");
    let output = dir.path().join("annotated.png");
    RgbImage::from_pixel(64, 48, Rgb([255, 255, 255]))
        .save(&input)
        .expect("write fixture");

    fidtag()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout("0 tags detected:\n");

    // Nothing drawn: the annotated copy is pixel-identical to the input.
    let round_trip = image::open(&output).expect("decodable output").to_rgb8();
    let original = image::open(&input).expect("decodable input").to_rgb8();
    assert_eq!(round_trip, original);
}

#[test]
fn tag_image_is_detected_and_annotated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("tag3.png");
    let output = dir.path().join("annotated.png");
    let (w, h) = save_rendered_tag(3, &input);

    fidtag()
        .arg(&input)
        .arg("--family")
        .arg("tag16h5")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1 tags detected:")
                .and(predicate::str::contains("Id: 3"))
                .and(predicate::str::contains("Hamming distance: 0"))
                .and(predicate::str::contains("good: yes")),
        );

    let annotated = image::open(&output).expect("decodable output").to_rgb8();
    assert_eq!(annotated.dimensions(), (w, h));
    // The overlay painted something.
    let original = image::open(&input).expect("decodable input").to_rgb8();
    assert_ne!(annotated, original);
}

#[test]
fn unwritable_output_fails_with_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("blank.png");
    RgbImage::from_pixel(32, 32, Rgb([255, 255, 255]))
        .save(&input)
        .expect("write fixture");
    let output = dir.path().join("missing-dir").join("annotated.png");

    fidtag()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("annotated.png"));
}
