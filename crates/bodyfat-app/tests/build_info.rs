//! Build id embedded by build.rs: `YYYY.MM.DD+g<short-sha>`

use bodyfat_app::BUILD_ID;

#[test]
fn test_build_id_format() {
    println!("Build ID: {}", BUILD_ID);
    if BUILD_ID == "unknown" {
        return;
    }

    let (date_part, git_part) = BUILD_ID
        .split_once('+')
        .expect("date and git parts separated by +");

    let date_pieces: Vec<&str> = date_part.split('.').collect();
    assert_eq!(date_pieces.len(), 3, "date should be YYYY.MM.DD");
    assert_eq!(date_pieces[0].len(), 4);
    date_pieces[0].parse::<u16>().expect("year");

    assert_eq!(date_pieces[1].len(), 2);
    let month: u8 = date_pieces[1].parse().expect("month");
    assert!((1..=12).contains(&month));

    assert_eq!(date_pieces[2].len(), 2);
    let day: u8 = date_pieces[2].parse().expect("day");
    assert!((1..=31).contains(&day));

    let sha = git_part.strip_prefix('g').expect("git part starts with g");
    if sha == "unknown" {
        println!("git unavailable in build environment");
    } else {
        assert!(!sha.is_empty());
        assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn test_build_id_not_empty() {
    assert!(!BUILD_ID.is_empty());
}
