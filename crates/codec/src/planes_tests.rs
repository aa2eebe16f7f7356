use super::*;

#[test]
fn test_zeros_shape() {
    let p = Planes::zeros(12);
    assert_eq!(p.shape(), [12, 8, 8]);
    assert_eq!(p.as_slice().len(), 12 * 64);
    assert!(p.nonzero_layers().is_empty());
}

#[test]
fn test_layout_is_layer_row_col() {
    let mut p = Planes::zeros(2);
    p.set(1, 2, 3, 1.0);
    assert_eq!(p.as_slice()[64 + 2 * 8 + 3], 1.0);
    assert_eq!(p.plane(1)[19], 1.0);
    p.add(1, 2, 3, 2.0);
    assert_eq!(p.get(1, 2, 3), 3.0);
    assert_eq!(p.nonzero_layers(), vec![1]);
}

#[test]
fn test_concat_appends_layers() {
    let mut a = Planes::zeros(1);
    a.set(0, 0, 0, 1.0);
    let mut b = Planes::zeros(2);
    b.set(1, 7, 7, 5.0);
    let c = a.concat(b);
    assert_eq!(c.layers(), 3);
    assert_eq!(c.get(0, 0, 0), 1.0);
    assert_eq!(c.get(2, 7, 7), 5.0);
}

#[test]
fn test_from_vec_checks_length() {
    assert!(Planes::from_vec(vec![0.0; 65]).is_none());
    assert_eq!(Planes::from_vec(vec![0.0; 128]).unwrap().layers(), 2);
}

#[test]
#[should_panic(expected = "outside")]
fn test_column_past_the_edge_panics() {
    let mut p = Planes::zeros(2);
    // Would land on (0, 1, 0) without the check.
    p.set(0, 0, 8, 1.0);
}

#[test]
#[should_panic(expected = "outside")]
fn test_row_past_the_edge_panics() {
    Planes::zeros(2).get(0, 8, 0);
}

#[test]
#[should_panic(expected = "outside")]
fn test_layer_past_the_end_panics() {
    Planes::zeros(1).get(1, 0, 0);
}
