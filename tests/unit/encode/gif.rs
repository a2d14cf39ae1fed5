use super::*;

fn out_dir(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_frame(path: &Path, shade: u8) {
    let img = image::RgbaImage::from_pixel(8, 6, image::Rgba([shade, 0, 0, 255]));
    img.save(path).unwrap();
}

#[test]
fn frame_names_need_prefix_digits_and_png() {
    assert!(is_frame_name(Path::new("out/frame_0001.png"), "frame_"));
    assert!(is_frame_name(Path::new("frame_12345.png"), "frame_"));
    assert!(!is_frame_name(Path::new("frame_.png"), "frame_"));
    assert!(!is_frame_name(Path::new("frame_00a1.png"), "frame_"));
    assert!(!is_frame_name(Path::new("palette.png"), "frame_"));
    assert!(!is_frame_name(Path::new("frame_0001.jpg"), "frame_"));
}

#[test]
fn list_frames_sorts_and_filters() {
    let dir = out_dir("encode_gif_list");
    for name in ["frame_0002.png", "frame_0000.png", "frame_0001.png"] {
        write_frame(&dir.join(name), 10);
    }
    std::fs::write(dir.join("palette.png"), b"not a frame").unwrap();

    let frames = list_frames(&dir, "frame_").unwrap();
    let names: Vec<_> = frames
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["frame_0000.png", "frame_0001.png", "frame_0002.png"]);
}

#[test]
fn looping_gif_holds_every_frame() {
    let dir = out_dir("encode_gif_write");
    let frames: Vec<PathBuf> = (0..3u8)
        .map(|i| {
            let p = dir.join(format!("frame_{i:04}.png"));
            write_frame(&p, 80 * i);
            p
        })
        .collect();
    let out = dir.join("anim.gif");
    let n = write_looping_gif(&frames, Fps::integer(24).unwrap(), &out).unwrap();
    assert_eq!(n, 3);

    use image::AnimationDecoder as _;
    let file = std::io::BufReader::new(File::open(&out).unwrap());
    let decoded = image::codecs::gif::GifDecoder::new(file)
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[0].buffer().dimensions(), (8, 6));
}

#[test]
fn empty_sequence_is_an_encode_error() {
    let err = write_looping_gif(&[], Fps::integer(24).unwrap(), Path::new("unused.gif")).unwrap_err();
    assert!(matches!(err, LineError::Encode(_)));
}
