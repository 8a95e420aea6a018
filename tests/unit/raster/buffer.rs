use super::*;

#[test]
fn new_is_transparent_and_sized() {
    let buf = PixelBuffer::new(3, 2).unwrap();
    assert_eq!(buf.dimensions(), (3, 2));
    assert_eq!(buf.as_raw().len(), 3 * 2 * 4);
    assert!(buf.pixels().all(|p| p == TRANSPARENT));
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(matches!(
        PixelBuffer::new(0, 4),
        Err(RasterFxError::Validation(_))
    ));
    assert!(PixelBuffer::filled(4, 0, [1, 2, 3, 4]).is_err());
}

#[test]
fn from_rgba8_checks_length() {
    assert!(PixelBuffer::from_rgba8(2, 1, vec![0; 8]).is_ok());
    assert!(PixelBuffer::from_rgba8(2, 1, vec![0; 7]).is_err());
}

#[test]
fn get_set_round_trip_and_bounds() {
    let mut buf = PixelBuffer::new(2, 2).unwrap();
    buf.set(1, 0, [9, 8, 7, 6]).unwrap();
    assert_eq!(buf.get(1, 0).unwrap(), [9, 8, 7, 6]);
    assert_eq!(buf.get(0, 0).unwrap(), TRANSPARENT);

    let err = buf.get(2, 0).unwrap_err();
    assert!(matches!(
        err,
        RasterFxError::OutOfBounds {
            x: 2,
            y: 0,
            width: 2,
            height: 2
        }
    ));
    assert!(buf.set(0, 2, [0, 0, 0, 0]).is_err());
}

#[test]
fn copy_is_independent() {
    let mut a = PixelBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
    let b = a.copy();
    a.set(0, 0, [0, 0, 0, 0]).unwrap();
    assert_eq!(b.get(0, 0).unwrap(), [1, 2, 3, 4]);
    assert_ne!(a, b);
}

#[test]
fn sample_rejects_negative_and_overflowing_coords() {
    let buf = PixelBuffer::filled(2, 2, [5, 5, 5, 5]).unwrap();
    assert_eq!(buf.sample(-1, 0), None);
    assert_eq!(buf.sample(0, 2), None);
    assert_eq!(buf.sample(1, 1), Some([5, 5, 5, 5]));
}

#[test]
fn gather_and_map_rows_see_matching_rows() {
    let buf = PixelBuffer::from_fn(3, 4, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
    let same = buf.gather(|x, y| buf.at(x, y));
    assert_eq!(same, buf);

    let rows = buf.map_rows(|y, src, dst| {
        assert_eq!(src[1], y as u8);
        dst.copy_from_slice(src);
    });
    assert_eq!(rows, buf);
}
