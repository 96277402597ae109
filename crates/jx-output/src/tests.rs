//! Integration tests for jx-output.

#[cfg(test)]
mod helpers {
    use jx_core::{GeoPoint, NodeId};
    use jx_spatial::{RoadNetwork, RoadNetworkBuilder};

    use crate::JunctionWriter;

    /// Render `net` exactly as it would land on disk.
    pub fn render(net: &RoadNetwork) -> String {
        let mut w = JunctionWriter::from_writer(Vec::new());
        w.write_network(net).unwrap();
        String::from_utf8(w.into_inner().unwrap()).unwrap()
    }

    /// The two-node example: A → B, one directed edge only.
    pub fn pair() -> (RoadNetwork, [NodeId; 2]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(1, GeoPoint::new(35.690000, 139.700000));
        let c = b.add_node(2, GeoPoint::new(35.691234567, 139.701234567));
        b.add_directed_edge(a, c, 170.0);
        (b.build(), [a, c])
    }
}

#[cfg(test)]
mod format {
    use jx_core::GeoPoint;

    use crate::format::{format_coord, format_point};

    #[test]
    fn trailing_zeros_dropped() {
        assert_eq!(format_coord(35.69), "35.69");
        assert_eq!(format_coord(139.7), "139.7");
        assert_eq!(format_coord(35.6900004), "35.69");
    }

    #[test]
    fn integral_keeps_one_decimal() {
        assert_eq!(format_coord(139.0), "139.0");
        assert_eq!(format_coord(0.0), "0.0");
    }

    #[test]
    fn rounds_to_six_places() {
        assert_eq!(format_coord(35.691234567), "35.691235");
        assert_eq!(format_coord(139.701234567), "139.701235");
        assert_eq!(format_coord(-88.0431234), "-88.043123");
    }

    #[test]
    fn exact_ties_round_to_even() {
        // 1/128 = 0.0078125 exactly.
        assert_eq!(format_coord(0.0078125), "0.007812");
        // 3/128 = 0.0234375 exactly.
        assert_eq!(format_coord(0.0234375), "0.023438");
    }

    #[test]
    fn point_is_lat_then_lon() {
        assert_eq!(format_point(GeoPoint::new(35.69, 139.7)), "35.69,139.7");
    }
}

#[cfg(test)]
mod writer {
    use jx_core::GeoPoint;
    use jx_spatial::{RoadNetworkBuilder, UndirectedView};

    use crate::{JunctionLine, JunctionWriter, WriteSummary, write_junctions};
    use super::helpers::{pair, render};

    #[test]
    fn two_node_example() {
        let (net, _) = pair();
        assert_eq!(
            render(&net),
            "35.69,139.7,35.691235,139.701235\n35.691235,139.701235,35.69,139.7\n"
        );
    }

    #[test]
    fn isolated_node_has_no_trailing_comma() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node(1, GeoPoint::new(35.69, 139.7));
        assert_eq!(render(&b.build()), "35.69,139.7\n");
    }

    #[test]
    fn neighbors_sorted_as_strings() {
        let mut b = RoadNetworkBuilder::new();
        let c = b.add_node(0, GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(1, GeoPoint::new(9.5, 1.0));
        let n2 = b.add_node(2, GeoPoint::new(10.0, 1.0));
        let n3 = b.add_node(3, GeoPoint::new(10.25, 2.0));
        b.add_road(c, n1, 1.0);
        b.add_road(c, n2, 1.0);
        b.add_directed_edge(n3, c, 1.0);
        let out = render(&b.build());
        let first = out.lines().next().unwrap();
        assert_eq!(first, "0.0,0.0,10.0,1.0,10.25,2.0,9.5,1.0");
    }

    #[test]
    fn neighbor_pairs_keep_lat_lon_split() {
        let mut b = RoadNetworkBuilder::new();
        let c = b.add_node(0, GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(1, GeoPoint::new(9.5, 1.0));
        let n2 = b.add_node(2, GeoPoint::new(-10.0, 139.701234567));
        b.add_road(c, n1, 1.0);
        b.add_road(c, n2, 1.0);
        let net = b.build();
        let view = UndirectedView::from_network(&net);

        let line = JunctionLine::build(&net, &view, c);
        assert_eq!(
            line.neighbors,
            vec![
                ("-10.0".to_string(), "139.701235".to_string()),
                ("9.5".to_string(), "1.0".to_string()),
            ]
        );
        let fields: Vec<&str> = line.fields().collect();
        assert_eq!(fields, ["0.0", "0.0", "-10.0", "139.701235", "9.5", "1.0"]);
    }

    #[test]
    fn multiplicity_collapses() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(1, GeoPoint::new(35.69, 139.7));
        let c = b.add_node(2, GeoPoint::new(35.70, 139.7));
        b.add_road(a, c, 1.0);
        b.add_directed_edge(a, c, 2.0);
        b.add_directed_edge(c, a, 3.0);
        assert_eq!(render(&b.build()), "35.69,139.7,35.7,139.7\n35.7,139.7,35.69,139.7\n");
    }

    #[test]
    fn distinct_nodes_with_equal_coordinates_both_listed() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(1, GeoPoint::new(35.69, 139.7));
        let c = b.add_node(2, GeoPoint::new(35.70, 139.7));
        let d = b.add_node(3, GeoPoint::new(35.70, 139.7));
        b.add_road(a, c, 1.0);
        b.add_road(a, d, 1.0);
        let net = b.build();
        let view = UndirectedView::from_network(&net);
        let line = JunctionLine::build(&net, &view, a);
        assert_eq!(line.to_string(), "35.69,139.7,35.7,139.7,35.7,139.7");
    }

    #[test]
    fn every_line_sorted_and_duplicate_free() {
        // 4×4 grid of two-way roads with some one-way duplicates on top.
        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<_> = (0..16)
            .map(|i| b.add_node(i, GeoPoint::new(35.68 + (i / 4) as f64 * 0.0013, 139.69 + (i % 4) as f64 * 0.0017)))
            .collect();
        for r in 0..4 {
            for c in 0..4 {
                let i = r * 4 + c;
                if c < 3 { b.add_road(ids[i], ids[i + 1], 1.0); }
                if r < 3 { b.add_directed_edge(ids[i + 4], ids[i], 1.0); }
            }
        }
        let net = b.build();
        let view = UndirectedView::from_network(&net);

        for n in net.nodes() {
            let line = JunctionLine::build(&net, &view, n);
            let joined: Vec<String> = line.neighbors.iter().map(|(a, b)| format!("{a},{b}")).collect();
            assert!(joined.windows(2).all(|w| w[0] < w[1]), "{joined:?}");
            assert_eq!(joined.len(), view.degree(n));
        }
    }

    #[test]
    fn summary_counts() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(1, GeoPoint::new(35.69, 139.7));
        let c = b.add_node(2, GeoPoint::new(35.70, 139.7));
        b.add_node(3, GeoPoint::new(35.71, 139.7));
        b.add_road(a, c, 1.0);

        let mut w = JunctionWriter::from_writer(Vec::new());
        let summary = w.write_network(&b.build()).unwrap();
        assert_eq!(summary, WriteSummary { lines: 3, isolated: 1, adjacencies: 1 });
    }

    #[test]
    fn file_is_overwritten_not_appended() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("junctions.csv");
        std::fs::write(&path, "stale,content,that,is,much,longer,than,the,new,output\n".repeat(20)).unwrap();

        let (net, _) = pair();
        write_junctions(&net, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, render(&net));
    }

    #[test]
    fn rerun_is_byte_identical() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("junctions.csv");
        let (net, _) = pair();

        write_junctions(&net, &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_junctions(&net, &path).unwrap();
        assert_eq!(first, std::fs::read(&path).unwrap());
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut w = JunctionWriter::create(&dir.path().join("j.csv")).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let (net, _) = pair();
        assert!(write_junctions(&net, &dir.path().join("no/such/dir/junctions.csv")).is_err());
    }
}

#[cfg(test)]
mod table {
    use jx_core::{GeoPoint, LocalPoint};

    use crate::JunctionTable;
    use super::helpers::{pair, render};

    #[test]
    fn reads_back_writer_output() {
        let (net, _) = pair();
        let table = JunctionTable::from_reader(render(&net).as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.junction(0).pos, GeoPoint::new(35.69, 139.7));
        assert_eq!(table.junction(0).adjacency, vec![1]);
        assert_eq!(table.junction(1).adjacency, vec![0]);
    }

    #[test]
    fn skips_bad_tokens_and_short_lines() {
        let text = "35.69,abc,139.7,35.70,139.71,99\nfoo\n1.5\n\n35.70,139.71\n";
        let table = JunctionTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let j = table.get(35.69, 139.7).unwrap();
        // Trailing unpaired 99 dropped.
        assert_eq!(j.neighbors, vec![GeoPoint::new(35.70, 139.71)]);
        assert_eq!(j.adjacency, vec![1]);
    }

    #[test]
    fn unmatched_neighbors_not_resolved() {
        let table = JunctionTable::from_reader("1.0,2.0,3.0,4.0\n".as_bytes()).unwrap();
        assert_eq!(table.junction(0).neighbors.len(), 1);
        assert!(table.junction(0).adjacency.is_empty());
    }

    #[test]
    fn duplicate_coordinates_last_wins() {
        let table = JunctionTable::from_reader("1.0,2.0\n1.0,2.0\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of(1.0, 2.0), Some(1));
    }

    #[test]
    fn every_junction_found_by_coordinates() {
        let text: String = (0..50)
            .map(|i| format!("{},{}\n", 35.68 + i as f64 * 0.0001, 139.69 + i as f64 * 0.0002))
            .collect();
        let table = JunctionTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.len(), 50);
        for (i, j) in table.junctions().iter().enumerate() {
            assert_eq!(table.index_of(j.pos.lat, j.pos.lon), Some(i));
        }
        assert_eq!(table.index_of(35.0, 139.0), None);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let table = JunctionTable::from_reader("-0.0,139.7\n".as_bytes()).unwrap();
        assert!(table.get(0.0, 139.7).is_some());
    }

    #[test]
    fn nearest_junction() {
        let text = "35.680,139.690\n35.690,139.700\n35.700,139.710\n";
        let table = JunctionTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.nearest(GeoPoint::new(35.691, 139.699)), Some(1));
        assert_eq!(table.nearest(GeoPoint::new(35.0, 139.0)), Some(0));

        let empty = JunctionTable::from_reader("".as_bytes()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.nearest(GeoPoint::new(0.0, 0.0)), None);
    }

    #[test]
    fn local_projection() {
        let (net, _) = pair();
        let mut table = JunctionTable::from_reader(render(&net).as_bytes()).unwrap();
        assert!(table.junction(0).local.is_none());

        table.project_local(GeoPoint::new(35.69, 139.7));
        assert_eq!(table.junction(0).local, Some(LocalPoint::new(0.0, 0.0)));

        let b = table.junction(1).local.unwrap();
        assert!(b.x > 0.0 && b.y > 0.0);
        assert_eq!(table.junction(0).local_neighbors, vec![b]);
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("junctions.csv");
        std::fs::write(&path, "35.69,139.7\n").unwrap();
        assert_eq!(JunctionTable::from_path(&path).unwrap().len(), 1);
        assert!(JunctionTable::from_path(&dir.path().join("missing.csv")).is_err());
    }
}

#[cfg(test)]
mod walk {
    use jx_core::{GeoPoint, WalkRng};

    use crate::{JunctionTable, LeastVisitedWalk, VisitCounter};

    /// Junction 0 at the centre, 1 and 2 as dead ends.
    fn star() -> JunctionTable {
        let text = "0.0,0.0,0.0,1.0,1.0,0.0\n0.0,1.0,0.0,0.0\n1.0,0.0,0.0,0.0\n";
        JunctionTable::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn prefers_unvisited_neighbors() {
        let table = star();
        let mut visits = VisitCounter::new(&table);
        let mut w = LeastVisitedWalk::start(&table, &mut visits, 10.0, WalkRng::new(7, 0)).unwrap();
        assert_eq!(visits.count(0), 1);

        let first = w.step(&table, &mut visits).unwrap().to;
        assert!(first == 1 || first == 2);
        assert_eq!(w.step(&table, &mut visits).unwrap().to, 0);
        let third = w.step(&table, &mut visits).unwrap().to;
        assert_eq!(first + third, 3, "both dead ends visited once");
        assert_eq!(visits.count(0), 2);
    }

    #[test]
    fn shared_counter_spreads_walkers() {
        let table = star();
        let mut visits = VisitCounter::new(&table);
        let mut a = LeastVisitedWalk::start(&table, &mut visits, 1.0, WalkRng::new(1, 0)).unwrap();
        let mut b = LeastVisitedWalk::start(&table, &mut visits, 1.0, WalkRng::new(1, 1)).unwrap();

        let ta = a.step(&table, &mut visits).unwrap().to;
        let tb = b.step(&table, &mut visits).unwrap().to;
        assert_ne!(ta, tb);
    }

    #[test]
    fn isolated_junction_is_stationary() {
        let table = JunctionTable::from_reader("5.0,5.0\n".as_bytes()).unwrap();
        let mut visits = VisitCounter::new(&table);
        let mut w = LeastVisitedWalk::start(&table, &mut visits, 1.0, WalkRng::new(3, 0)).unwrap();
        assert!(w.step(&table, &mut visits).is_none());
        assert_eq!(w.current(), 0);
    }

    #[test]
    fn empty_table_has_no_walker() {
        let table = JunctionTable::from_reader("".as_bytes()).unwrap();
        let mut visits = VisitCounter::new(&table);
        assert!(LeastVisitedWalk::start(&table, &mut visits, 1.0, WalkRng::new(3, 0)).is_none());
    }

    #[test]
    fn leg_duration_follows_speed() {
        let mut table = star();
        table.project_local(GeoPoint::new(0.0, 0.0));
        let mut visits = VisitCounter::new(&table);
        let mut w = LeastVisitedWalk::start(&table, &mut visits, 10.0, WalkRng::new(9, 0)).unwrap();

        let leg = w.step(&table, &mut visits).unwrap();
        assert!((leg.distance_m - 111_195.0).abs() < 50.0, "got {}", leg.distance_m);
        assert!((leg.duration_secs * 10.0 - leg.distance_m).abs() < 1e-6);
    }
}
