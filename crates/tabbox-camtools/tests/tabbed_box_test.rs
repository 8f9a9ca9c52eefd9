use tabbox_camtools::tabbed_box::{
    face_table, BoxLayout, BoxParameters, BoxType, DividerKeying, Edge, EdgeGenerator, Face,
    FaceKind, GcodeSettings, JointSettings, KeyDividerType, LayoutStyle, PanelRole,
    SchroffSettings, SvgOptions, TabBits, TabSymmetry, TabType, TabbedBoxMaker,
};
use tabbox_camtools::{CamToolError, ConstraintError};
use tabbox_core::{Direction, Path, Point, Segment};

const EPS: f64 = 1e-9;

fn reference_box() -> BoxParameters {
    BoxParameters {
        length: 80.0,
        width: 100.0,
        height: 40.0,
        thickness: 3.0,
        tab: 6.0,
        kerf: 0.0,
        inside: true,
        box_type: BoxType::FullBox,
        ..BoxParameters::default()
    }
}

fn generate(params: BoxParameters) -> BoxLayout {
    TabbedBoxMaker::new(params)
        .expect("valid parameters")
        .generate()
}

fn has_zero_length_segment(path: &Path) -> bool {
    path.segment_lengths().iter().any(|l| *l < EPS)
}

fn diagonal_segment(path: &Path) -> Option<(Point, Point)> {
    path.points()
        .zip(path.points().skip(1))
        .find(|(a, b)| (a.x - b.x).abs() > EPS && (a.y - b.y).abs() > EPS)
}

fn curve_count(path: &Path) -> usize {
    path.segments
        .iter()
        .filter(|s| matches!(s, Segment::CubicTo { .. }))
        .count()
}

const BOX_TYPES: [BoxType; 6] = [
    BoxType::FullBox,
    BoxType::OpenTop,
    BoxType::TwoSidesOpen,
    BoxType::ThreeSidesOpen,
    BoxType::OppositeEndsOpen,
    BoxType::TwoPanelsOnly,
];

#[test]
fn test_full_box_six_closed_panels() {
    let layout = generate(reference_box());
    assert_eq!(layout.panels.len(), 6);
    for panel in &layout.panels {
        assert!(panel.outline.is_closed(EPS), "{:?} not closed", panel.role);
        assert!(
            !has_zero_length_segment(&panel.outline),
            "{:?} has a zero-length segment",
            panel.role
        );
        assert!(panel.outline.len() > 4);
    }
}

#[test]
fn test_inside_dimensions_grow_by_two_thickness() {
    let maker = TabbedBoxMaker::new(reference_box()).unwrap();
    let (x, y, z) = maker.dimensions();
    assert!((x - 86.0).abs() < EPS);
    assert!((y - 106.0).abs() < EPS);
    assert!((z - 46.0).abs() < EPS);
}

#[test]
fn test_full_box_panel_bounds_match_size() {
    let layout = generate(reference_box());
    for panel in &layout.panels {
        let b = panel.outline.bounds();
        assert!((b.width() - panel.width).abs() < 1e-6, "{:?}", panel.role);
        assert!((b.height() - panel.height).abs() < 1e-6, "{:?}", panel.role);
        assert!(b.min.approx_eq(&panel.origin, 1e-6), "{:?}", panel.role);
    }
}

#[test]
fn test_panels_close_for_every_box_type_and_symmetry() {
    let symmetries = [
        TabSymmetry::XySymmetric,
        TabSymmetry::Rotational,
        TabSymmetry::Antisymmetric,
    ];
    for box_type in BOX_TYPES {
        for tab_symmetry in symmetries {
            for inside in [false, true] {
                let layout = generate(BoxParameters {
                    box_type,
                    tab_symmetry,
                    inside,
                    kerf: 0.2,
                    ..reference_box()
                });
                assert_eq!(layout.panels.len(), box_type.faces().count());
                for panel in &layout.panels {
                    assert!(
                        panel.outline.is_closed(EPS),
                        "{box_type:?} {tab_symmetry:?} inside={inside} {:?}",
                        panel.role
                    );
                }
            }
        }
    }
}

#[test]
fn test_outlines_only_run_along_axes() {
    let symmetries = [
        TabSymmetry::XySymmetric,
        TabSymmetry::Rotational,
        TabSymmetry::Antisymmetric,
    ];
    for box_type in BOX_TYPES {
        for tab_symmetry in symmetries {
            for inside in [false, true] {
                let layout = generate(BoxParameters {
                    box_type,
                    tab_symmetry,
                    inside,
                    dividers_length: 1,
                    dividers_width: 1,
                    key_dividers: KeyDividerType::WallsAndFloor,
                    ..reference_box()
                });
                for panel in &layout.panels {
                    assert_eq!(
                        diagonal_segment(&panel.outline),
                        None,
                        "{box_type:?} {tab_symmetry:?} inside={inside} {:?}",
                        panel.role
                    );
                }
            }
        }
    }
}

#[test]
fn test_rotational_open_top_inside_front_is_square() {
    let layout = generate(BoxParameters {
        box_type: BoxType::OpenTop,
        tab_symmetry: TabSymmetry::Rotational,
        ..reference_box()
    });
    let front = layout.panel(Face::Front).unwrap();
    assert_eq!(diagonal_segment(&front.outline), None);
    assert!(front.outline.is_closed(EPS));
    // the open rim is one straight run at the tab base line
    let rim_y = front.origin.y + 3.0;
    let on_rim = front
        .outline
        .points()
        .filter(|p| (p.y - rim_y).abs() < EPS)
        .count();
    assert!(on_rim >= 2);
    assert!(front.outline.points().all(|p| p.y >= rim_y - EPS));
}

#[test]
fn test_open_top_clears_front_edge() {
    let layout = generate(BoxParameters {
        box_type: BoxType::OpenTop,
        ..reference_box()
    });
    assert_eq!(layout.panels.len(), 5);
    assert!(layout.panel(Face::Top).is_none());

    let front = layout.panel(Face::Front).unwrap();
    assert_eq!(front.tabbed, TabBits(0b0111));
    // inside boxes keep the open edge on the tab base line
    assert!(front.tab_info.top());

    let outside = generate(BoxParameters {
        box_type: BoxType::OpenTop,
        inside: false,
        ..reference_box()
    });
    let front = outside.panel(Face::Front).unwrap();
    assert_eq!(front.tabbed, TabBits(0b0111));
    assert!(!front.tab_info.top());
}

#[test]
fn test_face_omission_tables() {
    let cases = [
        (
            BoxType::OpenTop,
            [(Face::Front, 0b0111), (Face::Back, 0b1101), (Face::Left, 0b1110), (Face::Right, 0b1011)],
        ),
        (
            BoxType::TwoSidesOpen,
            [(Face::Bottom, 0b0111), (Face::Back, 0b1101), (Face::Left, 0b0110), (Face::Right, 0b0011)],
        ),
        (
            BoxType::OppositeEndsOpen,
            [(Face::Front, 0b0101), (Face::Back, 0b0101), (Face::Left, 0b1010), (Face::Right, 0b1010)],
        ),
    ];
    for (box_type, expected) in cases {
        let table = face_table(TabSymmetry::XySymmetric, &box_type.faces(), false);
        for (face, bits) in expected {
            assert_eq!(table.get(face).tabbed, TabBits(bits), "{box_type:?} {face:?}");
        }
    }
}

#[test]
fn test_generated_panels_carry_table_codes() {
    let params = BoxParameters {
        box_type: BoxType::ThreeSidesOpen,
        ..reference_box()
    };
    let maker = TabbedBoxMaker::new(params).unwrap();
    let table = maker.face_table();
    let layout = maker.generate();
    for panel in layout.shell_panels() {
        let PanelRole::Shell(face) = panel.role else {
            panic!("divider in shell panels");
        };
        assert_eq!(panel.tabbed, table.get(face).tabbed);
        assert_eq!(panel.tab_info, table.get(face).tab_info);
    }
}

#[test]
fn test_floor_keyed_dividers() {
    let layout = generate(BoxParameters {
        dividers_length: 2,
        dividers_width: 1,
        key_dividers: KeyDividerType::FloorOnly,
        ..reference_box()
    });
    assert_eq!(layout.panels.len(), 9);

    let length: Vec<_> = layout
        .dividers()
        .filter(|p| p.role == PanelRole::LengthDivider)
        .collect();
    let width: Vec<_> = layout
        .dividers()
        .filter(|p| p.role == PanelRole::WidthDivider)
        .collect();
    assert_eq!(length.len(), 2);
    assert_eq!(width.len(), 1);

    let horizontal = TabBits::TOP | TabBits::BOTTOM;
    let vertical = TabBits::RIGHT | TabBits::LEFT;
    for d in &length {
        assert_eq!(d.kind, FaceKind::Xz);
        assert_eq!(d.tabbed.0 & horizontal, horizontal);
        assert_eq!(d.tabbed.0 & vertical, 0);
        assert!(d.outline.is_closed(EPS));
        // one interlocking slot for the single width divider
        assert_eq!(d.holes.len(), 1);
    }
    for d in &width {
        assert_eq!(d.kind, FaceKind::Zy);
        assert_eq!(d.tabbed.0 & vertical, vertical);
        assert_eq!(d.tabbed.0 & horizontal, 0);
        assert!(d.outline.is_closed(EPS));
        assert_eq!(d.holes.len(), 2);
    }

    // the floor is keyed, the walls are not
    assert_eq!(layout.panel(Face::Bottom).unwrap().holes.len(), 20);
    assert!(layout.panel(Face::Back).unwrap().holes.is_empty());
    assert!(layout.panel(Face::Left).unwrap().holes.is_empty());
}

#[test]
fn test_unkeyed_dividers_have_no_shell_holes() {
    let layout = generate(BoxParameters {
        dividers_length: 1,
        dividers_width: 1,
        key_dividers: KeyDividerType::None,
        ..reference_box()
    });
    for panel in layout.shell_panels() {
        assert!(panel.holes.is_empty(), "{:?}", panel.role);
    }
    for d in layout.dividers() {
        assert_eq!(d.tabbed, TabBits::NONE);
    }
}

#[test]
fn test_divider_rows_sit_below_shell() {
    let params = BoxParameters {
        dividers_length: 2,
        dividers_width: 1,
        key_dividers: KeyDividerType::WallsAndFloor,
        ..reference_box()
    };
    let spacing = params.spacing;
    let layout = generate(params);
    let (x, y, z) = layout.dimensions;
    let length: Vec<_> = layout
        .dividers()
        .filter(|p| p.role == PanelRole::LengthDivider)
        .collect();
    assert!((length[0].origin.y - (4.0 * spacing + y + 2.0 * z)).abs() < EPS);
    assert!((length[1].origin.x - (spacing + x)).abs() < EPS);
    let width = layout
        .dividers()
        .find(|p| p.role == PanelRole::WidthDivider)
        .unwrap();
    assert!((width.origin.y - (5.0 * spacing + y + 3.0 * z)).abs() < EPS);
}

#[test]
fn test_finger_holes_on_open_rims() {
    let params = BoxParameters {
        box_type: BoxType::OpenTop,
        dividers_length: 2,
        dividers_width: 1,
        key_dividers: KeyDividerType::WallsAndFloor,
        cutout_width_percent: 50.0,
        cutout_height_percent: 40.0,
        ..reference_box()
    };
    let layout = generate(params.clone());
    for d in layout.dividers() {
        let expected = if d.role == PanelRole::LengthDivider { 2 } else { 0 };
        assert_eq!(curve_count(&d.outline), expected, "{:?}", d.role);
        assert!(d.outline.is_closed(EPS));
    }
    let front = layout.panel(Face::Front).unwrap();
    assert_eq!(curve_count(&front.outline), 2);
    assert!(front.outline.is_closed(EPS));
    // notches cut into the panel, never past its far edge
    let b = front.outline.bounds();
    assert!(b.max.y <= front.origin.y + front.height + 1e-6);
    assert!(layout.to_svg(&SvgOptions::default()).contains(" C "));
    for face in [Face::Back, Face::Left, Face::Right, Face::Bottom] {
        assert_eq!(curve_count(&layout.panel(face).unwrap().outline), 0);
    }

    // the front only gets notches in the diagrammatic layout
    let inline = generate(BoxParameters {
        layout: LayoutStyle::Inline,
        ..params.clone()
    });
    assert_eq!(curve_count(&inline.panel(Face::Front).unwrap().outline), 0);
    let no_front = generate(BoxParameters {
        cutout_front: false,
        ..params.clone()
    });
    assert_eq!(curve_count(&no_front.panel(Face::Front).unwrap().outline), 0);

    // a lid joint leaves no room for a notch
    let lidded = generate(BoxParameters {
        box_type: BoxType::FullBox,
        ..params
    });
    for panel in &lidded.panels {
        assert_eq!(curve_count(&panel.outline), 0, "{:?}", panel.role);
    }
}

#[test]
fn test_dogbone_adds_relief_segments() {
    let base = BoxParameters {
        kerf: 0.5,
        ..BoxParameters::default()
    };
    let laser = generate(base.clone());
    let dogbone = generate(BoxParameters {
        tab_type: TabType::Dogbone,
        ..base
    });
    for (a, b) in laser.panels.iter().zip(&dogbone.panels) {
        assert!(b.outline.len() > a.outline.len(), "{:?}", a.role);
        assert!(b.outline.is_closed(EPS));
    }
}

#[test]
fn test_dogbone_leaves_plain_edges_alone() {
    let mut joint = JointSettings {
        thickness: 3.0,
        kerf: 0.5,
        tab: 10.0,
        equal_tabs: false,
        symmetry: TabSymmetry::XySymmetric,
        dogbone: false,
        dimple_height: 0.0,
        dimple_length: 0.0,
    };
    let edge = Edge {
        root: Point::new(0.0, 0.0),
        start_offset: Point::new(0.0, 0.0),
        end_offset: Point::new(0.0, 0.0),
        tab_vec: 0.0,
        length: 100.0,
        direction: Direction::Right,
        is_tab: true,
        is_divider: false,
        num_dividers: 0,
        divider_spacing: 0.0,
        prev_tabbed: false,
        cutouts: Vec::new(),
    };
    let mut holes = Vec::new();
    let plain = EdgeGenerator::new(&joint).draw(&edge, &mut holes);
    joint.dogbone = true;
    let relieved = EdgeGenerator::new(&joint).draw(&edge, &mut holes);
    assert_eq!(plain, relieved);
}

fn hole_edge(is_tab: bool) -> (JointSettings, Edge) {
    let joint = JointSettings {
        thickness: 3.0,
        kerf: 0.5,
        tab: 10.0,
        equal_tabs: false,
        symmetry: TabSymmetry::XySymmetric,
        dogbone: false,
        dimple_height: 0.0,
        dimple_length: 0.0,
    };
    let edge = Edge {
        root: Point::new(0.0, 0.0),
        start_offset: Point::new(0.0, 0.0),
        end_offset: Point::new(0.0, 0.0),
        tab_vec: if is_tab { -3.0 } else { 3.0 },
        length: 100.0,
        direction: Direction::Right,
        is_tab,
        is_divider: false,
        num_dividers: 2,
        divider_spacing: 20.0,
        prev_tabbed: false,
        cutouts: Vec::new(),
    };
    (joint, edge)
}

#[test]
fn test_key_holes_per_qualifying_division() {
    // 9 divisions: gaps at 1, 3, 5, 7 on a tab edge, plus the final gap
    let (joint, edge) = hole_edge(true);
    let mut holes = Vec::new();
    EdgeGenerator::new(&joint).draw(&edge, &mut holes);
    assert_eq!(holes.len(), 2 * 5);

    // tabs at 2, 4, 6, 8 on a receiving edge
    let (joint, edge) = hole_edge(false);
    let mut holes = Vec::new();
    EdgeGenerator::new(&joint).draw(&edge, &mut holes);
    assert_eq!(holes.len(), 2 * 4);

    for hole in &holes {
        assert!(hole.is_closed(EPS));
        assert_eq!(hole.len(), 4);
    }
}

#[test]
fn test_antisymmetric_edge_has_no_trailing_key_hole() {
    let (mut joint, edge) = hole_edge(true);
    joint.symmetry = TabSymmetry::Antisymmetric;
    let mut holes = Vec::new();
    EdgeGenerator::new(&joint).draw(&edge, &mut holes);
    // gaps at 1, 3, 5, 7 only
    assert_eq!(holes.len(), 2 * 4);

    let layout = generate(BoxParameters {
        tab_symmetry: TabSymmetry::Antisymmetric,
        dividers_length: 1,
        key_dividers: KeyDividerType::WallsAndFloor,
        ..reference_box()
    });
    assert_eq!(layout.dividers().count(), 1);
    for panel in &layout.panels {
        assert!(panel.outline.is_closed(EPS), "{:?}", panel.role);
    }
}

#[test]
fn test_key_holes_step_by_divider_spacing() {
    let (joint, edge) = hole_edge(false);
    let mut holes = Vec::new();
    EdgeGenerator::new(&joint).draw(&edge, &mut holes);
    let dy = holes[1].start.y - holes[0].start.y;
    assert!((dy - 20.0).abs() < EPS);
    assert!((holes[0].start.x - holes[1].start.x).abs() < EPS);
}

#[test]
fn test_divider_keying_pitch() {
    let k = DividerKeying::new(103.0, 53.0, 3.0, 1, 4, true, false);
    assert!((k.x_spacing - 20.0).abs() < EPS);
    assert!((k.y_spacing - 25.0).abs() < EPS);
}

#[test]
fn test_three_piece_layout() {
    let layout = generate(BoxParameters {
        layout: LayoutStyle::ThreePiece,
        ..reference_box()
    });
    let roles: Vec<_> = layout.panels.iter().map(|p| p.role).collect();
    assert_eq!(
        roles,
        vec![
            PanelRole::Shell(Face::Back),
            PanelRole::Shell(Face::Left),
            PanelRole::Shell(Face::Bottom),
        ]
    );
}

#[test]
fn test_inline_layout_single_row() {
    let params = reference_box();
    let spacing = params.spacing;
    let layout = generate(BoxParameters {
        layout: LayoutStyle::Inline,
        ..params
    });
    assert_eq!(layout.panels.len(), 6);
    for p in &layout.panels {
        assert!((p.origin.y - spacing).abs() < EPS);
    }
    let top = layout.panel(Face::Top).unwrap();
    assert!((top.origin.x - spacing).abs() < EPS);
}

#[test]
fn test_diagrammatic_floor_position() {
    let params = reference_box();
    let s = params.spacing;
    let layout = generate(params);
    let (_, _, z) = layout.dimensions;
    let bottom = layout.panel(Face::Bottom).unwrap();
    assert!(bottom.origin.approx_eq(&Point::new(2.0 * s + z, 2.0 * s + z), EPS));
}

#[test]
fn test_panels_do_not_overlap_in_diagrammatic_layout() {
    let layout = generate(reference_box());
    let boxes: Vec<_> = layout.panels.iter().map(|p| p.bounds()).collect();
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            let (a, b) = (&boxes[i], &boxes[j]);
            let overlap = a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y;
            assert!(!overlap, "panels {i} and {j} overlap");
        }
    }
}

#[test]
fn test_schroff_rail_holes() {
    let layout = generate(BoxParameters {
        height: 150.0,
        schroff: Some(SchroffSettings {
            rows: 2,
            hp: 42,
            ..SchroffSettings::default()
        }),
        ..BoxParameters::default()
    });
    let (x, y, _) = layout.dimensions;
    assert!((x - 42.0 * 5.08).abs() < EPS);
    assert!((y - (2.0 * (122.5 + 10.0) + 10.0)).abs() < EPS);
    assert_eq!(layout.panel(Face::Left).unwrap().circles.len(), 4);
    assert_eq!(layout.panel(Face::Right).unwrap().circles.len(), 4);
    assert!(layout.panel(Face::Bottom).unwrap().circles.is_empty());
}

#[test]
fn test_validation_collects_errors() {
    let err = TabbedBoxMaker::new(BoxParameters {
        tab: 2.0,
        spacing: 0.1,
        ..BoxParameters::default()
    })
    .err()
    .expect("should fail");
    let CamToolError::Validation(errs) = err else {
        panic!("expected validation error");
    };
    assert!(errs.errors().iter().any(|e| matches!(e, ConstraintError::Tab(_))));
    assert!(errs.errors().iter().any(|e| matches!(e, ConstraintError::Spacing(_))));
}

#[test]
fn test_oversized_box_rejected() {
    let err = TabbedBoxMaker::new(BoxParameters {
        length: 20_000.0,
        ..BoxParameters::default()
    });
    assert!(err.is_err());
}

#[test]
fn test_svg_output() {
    let layout = generate(BoxParameters {
        dividers_length: 1,
        key_dividers: KeyDividerType::WallsAndFloor,
        ..reference_box()
    });
    let svg = layout.to_svg(&SvgOptions::default());
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("viewBox=\""));
    assert!(svg.contains("<g id=\"panel0\""));
    assert!(svg.contains("stroke-width:0.0508"));
    let expected: usize = layout.panels.iter().map(|p| 1 + p.holes.len()).sum();
    assert_eq!(svg.matches("<path ").count(), expected);
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_svg_circles_for_schroff() {
    let layout = generate(BoxParameters {
        schroff: Some(SchroffSettings::default()),
        ..BoxParameters::default()
    });
    let svg = layout.to_svg(&SvgOptions::default());
    assert_eq!(svg.matches("<circle ").count(), 4);
}

#[test]
fn test_gcode_output() {
    let layout = generate(reference_box());
    let settings = GcodeSettings {
        passes: 2,
        ..GcodeSettings::default()
    };
    let gcode = layout.to_gcode(&settings);
    assert!(gcode.contains("G21 ; Set units to millimeters"));
    assert!(gcode.contains("M3 S1000 ; Laser on"));
    assert!(gcode.contains("; Pass 2/2"));
    assert!(gcode.contains("; Panel 6: Front"));
    assert!(gcode.trim_end().ends_with("M2 ; Program end"));

    // the drawing's lower-left corner lands on the work offset
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for line in gcode.lines().filter(|l| l.starts_with("G1 ")) {
        for word in line.split_whitespace() {
            if let Some(v) = word.strip_prefix('X') {
                min_x = min_x.min(v.parse().unwrap());
            }
            if let Some(v) = word.strip_prefix('Y') {
                min_y = min_y.min(v.parse().unwrap());
            }
        }
    }
    assert!((min_x - settings.offset_x).abs() < 1e-3);
    assert!((min_y - settings.offset_y).abs() < 1e-3);
}

#[test]
fn test_gcode_header_lists_box_settings() {
    let layout = generate(BoxParameters {
        box_type: BoxType::OpenTop,
        kerf: 0.2,
        dividers_length: 2,
        dividers_width: 1,
        key_dividers: KeyDividerType::FloorOnly,
        ..reference_box()
    });
    let gcode = layout.to_gcode(&GcodeSettings::default());
    let header: Vec<&str> = gcode.lines().take_while(|l| l.starts_with(';')).collect();
    for line in [
        "; Box Type: OpenTop",
        "; Length dividers: 2",
        "; Width dividers: 1",
        "; Divider Keying: FloorOnly",
        "; Material thickness: 3 mm",
        "; Kerf: 0.2 mm",
        "; Tab width: 6 mm",
    ] {
        assert!(header.contains(&line), "missing {line:?}");
    }
}

#[test]
fn test_json_round_trip() {
    let layout = generate(reference_box());
    let json = layout.to_json().unwrap();
    let back: BoxLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back.panels.len(), layout.panels.len());
    assert_eq!(back.dimensions, layout.dimensions);
    assert_eq!(back.parameters, layout.parameters);
}
