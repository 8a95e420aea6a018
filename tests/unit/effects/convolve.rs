use super::*;

fn checker(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |x, y| {
        if (x + y) % 2 == 0 {
            [240, 30, 90, 200]
        } else {
            [10, 160, 60, 100]
        }
    })
    .unwrap()
}

#[test]
fn blur_preserves_uniform_field() {
    for px in [[200, 17, 99, 255], [1, 2, 3, 4], [255, 255, 255, 255]] {
        let img = PixelBuffer::filled(6, 5, px).unwrap();
        assert_eq!(blur(&img), img);
    }
}

#[test]
fn border_frame_is_copied_unchanged() {
    let img = checker(5, 4);
    let out = edge(&img);
    for x in 0..5 {
        assert_eq!(out.get(x, 0).unwrap(), img.get(x, 0).unwrap());
        assert_eq!(out.get(x, 3).unwrap(), img.get(x, 3).unwrap());
    }
    for y in 0..4 {
        assert_eq!(out.get(0, y).unwrap(), img.get(0, y).unwrap());
        assert_eq!(out.get(4, y).unwrap(), img.get(4, y).unwrap());
    }
}

#[test]
fn tiny_images_are_all_border() {
    let img = checker(2, 7);
    assert_eq!(sharpen(&img), img);
    assert_eq!(emboss(&checker(9, 1)), checker(9, 1));
}

#[test]
fn edge_zeroes_flat_regions_and_keeps_alpha() {
    let img = PixelBuffer::filled(4, 4, [90, 90, 90, 33]).unwrap();
    let out = edge(&img);
    assert_eq!(out.get(1, 1).unwrap(), [0, 0, 0, 33]);
    assert_eq!(out.get(2, 2).unwrap(), [0, 0, 0, 33]);
}

#[test]
fn sharpen_amplifies_centre_spike() {
    let mut img = PixelBuffer::filled(3, 3, [50, 50, 50, 255]).unwrap();
    img.set(1, 1, [100, 100, 100, 255]).unwrap();
    // 5*100 - 4*50 = 300, saturated
    assert_eq!(sharpen(&img).get(1, 1).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn emboss_flips_kernel_so_top_left_light_raises_centre() {
    // The +2 corner of the emboss kernel lands on the top-left neighbour.
    let mut img = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
    img.set(0, 0, [10, 10, 10, 255]).unwrap();
    assert_eq!(emboss(&img).get(1, 1).unwrap(), [20, 20, 20, 255]);

    let mut img = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
    img.set(2, 2, [10, 10, 10, 255]).unwrap();
    assert_eq!(emboss(&img).get(1, 1).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn asymmetric_kernel_is_rotated_half_turn() {
    let k = Kernel::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let img = PixelBuffer::from_fn(3, 3, |x, y| [(x + 3 * y) as u8 * 10, 0, 0, 255]).unwrap();
    // Top-left weight picks up the bottom-right neighbour (2, 2).
    assert_eq!(convolve(&img, &k).get(1, 1).unwrap(), [80, 0, 0, 255]);
}

#[test]
fn neon_is_edge_of_grayscale_and_outline_is_edge() {
    let img = checker(6, 6);
    assert_eq!(neon(&img), edge(&color::grayscale(&img)));
    assert_eq!(outline(&img), edge(&img));
}
