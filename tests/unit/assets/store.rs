use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./img//bird-a.jpg").unwrap(), "img/bird-a.jpg");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(PreparedImage::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(PreparedImage::from_premul(0, 2, vec![]).is_err());
}

#[test]
fn solid_premultiplies_and_reads_back() {
    let img = PreparedImage::solid(3, 2, [255, 0, 0, 128]).unwrap();
    assert_eq!(img.pixel(0, 0), Some([128, 0, 0, 128]));
    assert_eq!(img.pixel(2, 1), Some([128, 0, 0, 128]));
    assert_eq!(img.pixel(3, 0), None);
}
