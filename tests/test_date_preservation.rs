use std::fs;

use recipe_converter::batch::extract_existing_date;
use recipe_converter::{
    convert_file, parse, render, render_with_today, ConversionStatus, ConvertOptions,
    ConverterConfig,
};

const SOURCE: &str = "title: Lentil Soup
category: soups
youtube: https://www.youtube.com/watch?v=abcdefghijk
Ingredients
- 1 cup red lentils
Instructions
- Rinse the lentils
";

#[test]
fn test_rerender_keeps_first_date() {
    let doc = parse(SOURCE);
    let first = render(&doc, None);
    let date = extract_existing_date(&first).expect("generated output has a date");

    let second = render_with_today(&doc, Some(&date), "2099-12-31");
    assert_eq!(extract_existing_date(&second), Some(date));
    assert!(!second.contains("2099-12-31"));
}

#[test]
fn test_only_date_differs_between_runs() {
    let doc = parse(SOURCE);
    let a = render_with_today(&doc, None, "2024-01-01");
    let b = render_with_today(&doc, None, "2024-06-30");
    assert_eq!(
        a.replace("2024-01-01", "DATE"),
        b.replace("2024-06-30", "DATE")
    );
}

#[test]
fn test_convert_file_twice_reports_update_and_keeps_date() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lentil-soup.txt");
    fs::write(&input, SOURCE).unwrap();

    let config = ConverterConfig {
        content_dir: dir.path().join("content"),
        ..Default::default()
    };

    let first = convert_file(&input, &ConvertOptions::default(), &config).unwrap();
    assert_eq!(first.status, ConversionStatus::Created);
    assert_eq!(
        first.output_path,
        dir.path().join("content/soups/lentil-soup.mdx")
    );

    // Pin an old date in the generated file, as if it were produced long ago
    let written = fs::read_to_string(&first.output_path).unwrap();
    let today = extract_existing_date(&written).unwrap();
    fs::write(
        &first.output_path,
        written.replace(&format!("date: \"{today}\""), "date: \"2001-02-03\""),
    )
    .unwrap();

    let second = convert_file(&input, &ConvertOptions::default(), &config).unwrap();
    assert_eq!(second.status, ConversionStatus::Updated);

    let rewritten = fs::read_to_string(&second.output_path).unwrap();
    assert_eq!(extract_existing_date(&rewritten).as_deref(), Some("2001-02-03"));
    assert_eq!(rewritten.matches("<YouTube").count(), 1);
}

#[test]
fn test_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("soup.txt");
    fs::write(&input, SOURCE).unwrap();
    let target = dir.path().join("nested/out/custom.mdx");

    let options = ConvertOptions {
        output: Some(target.clone()),
        ..Default::default()
    };
    let outcome = convert_file(&input, &options, &ConverterConfig::default()).unwrap();

    assert_eq!(outcome.output_path, target);
    assert!(target.exists());
    assert_eq!(outcome.title.as_deref(), Some("Lentil Soup"));
    assert_eq!(outcome.ingredient_count, 1);
    assert_eq!(outcome.step_count, 1);
}
