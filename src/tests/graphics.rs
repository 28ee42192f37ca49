use crate::console::graphics::{emit, fit, ImageData, CHUNK_SIZE};

fn chunks_of(output: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(output);
    text.split("\x1b_G")
        .skip(1)
        .map(|chunk| chunk.trim_end_matches("\x1b\\").to_string())
        .collect()
}

#[test]
fn single_chunk_is_final() {
    let mut out = Vec::new();
    emit(&mut out, &ImageData::Png(&[1, 2, 3]), 4, 2).unwrap();

    let chunks = chunks_of(&out);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].starts_with("a=T,f=100,c=4,r=2,m=0;"));
}

#[test]
fn payloads_chunk_at_4096_and_only_the_final_chunk_carries_m0() {
    let pixels = vec![0u8; 9_000];
    let mut out = Vec::new();
    emit(
        &mut out,
        &ImageData::Rgb {
            width: 50,
            height: 60,
            pixels: &pixels,
        },
        10,
        5,
    )
    .unwrap();

    let chunks = chunks_of(&out);
    assert!(chunks.len() > 1);

    for (i, chunk) in chunks.iter().enumerate() {
        let (keys, payload) = chunk.split_once(';').expect("chunk has a payload");
        assert!(
            payload.len() <= CHUNK_SIZE,
            "chunk {} payload is {} bytes",
            i,
            payload.len()
        );
        let last = i == chunks.len() - 1;
        if last {
            assert!(keys.ends_with("m=0"));
        } else {
            assert!(keys.ends_with("m=1"));
        }
        if i == 0 {
            assert!(keys.contains("f=24"));
            assert!(keys.contains("s=50"));
            assert!(keys.contains("v=60"));
            assert!(keys.contains("c=10"));
            assert!(keys.contains("r=5"));
        } else {
            assert_eq!(keys, format!("m={}", if last { 0 } else { 1 }));
        }
    }

    // base64 of 9000 bytes is 12000 characters: three chunks.
    assert_eq!(chunks.len(), 3);
}

#[test]
fn payload_is_valid_base64_when_reassembled() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let pixels: Vec<u8> = (0..=255).cycle().take(6000).collect();
    let mut out = Vec::new();
    emit(
        &mut out,
        &ImageData::Rgb {
            width: 50,
            height: 40,
            pixels: &pixels,
        },
        10,
        8,
    )
    .unwrap();

    let payload: String = chunks_of(&out)
        .iter()
        .map(|c| c.split_once(';').unwrap().1.to_string())
        .collect();
    assert_eq!(STANDARD.decode(payload).unwrap(), pixels);
}

#[test]
fn fit_scales_down_preserving_aspect() {
    // 10x20-pixel cells: a 400x400 image is natively 40 columns wide.
    let (cols, rows) = fit(400, 400, 20, (80, 24), (800, 480)).unwrap();
    assert_eq!(cols, 20);
    // 20 cols * 10 px = 200 px shown width, so 200 px height: 10 rows.
    assert_eq!(rows, 10);
}

#[test]
fn fit_without_pixel_info_reports_none() {
    assert_eq!(fit(100, 100, 20, (80, 24), (0, 0)), None);
    assert_eq!(fit(0, 0, 20, (80, 24), (800, 480)), None);
}
