//! Integration tests for rg-output.

#[cfg(test)]
mod helpers {
    use std::convert::Infallible;

    use rg_core::RoadConfig;
    use rg_network::{Entity, PathRecord, PointRecord, RoadGraph, SpeedPolicy, build_graph};

    /// A two-way residential A–B plus a one-way primary B→C, and an
    /// isolated point Z.
    pub fn sample_graph() -> RoadGraph {
        let stream: Vec<Entity> = vec![
            PointRecord::new("Z", 5.0, 5.0).into(),
            PathRecord::new(
                vec![PointRecord::new("A", 0.0, 0.0), PointRecord::new("B", 0.0, 1.0)],
                [("highway", "residential")],
            )
            .into(),
            PathRecord::new(
                vec![PointRecord::new("B", 0.0, 1.0), PointRecord::new("C", 0.5, 1.0)],
                [("highway", "primary"), ("oneway", "yes")],
            )
            .into(),
        ];
        build_graph(&RoadConfig::default(), SpeedPolicy::Abort, stream.into_iter().map(Ok::<_, Infallible>))
            .unwrap()
            .0
    }
}

#[cfg(test)]
mod json_tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::helpers::sample_graph;
    use crate::json::{JsonWriter, read_json, read_json_file, write_json_file};
    use crate::writer::GraphWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn file_round_trip() {
        let dir = tmp();
        let path = dir.path().join("graph.json");
        let g = sample_graph();
        write_json_file(&g, &path).unwrap();
        let back = read_json_file(&path).unwrap();
        assert_eq!(back, g);
        let keys: Vec<_> = back.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["Z", "A", "B", "C"]);
    }

    #[test]
    fn document_shape() {
        let mut w = JsonWriter::new(Vec::new());
        w.write_graph(&sample_graph()).unwrap();
        let bytes = w.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"Z":{"lat":5.0,"lon":5.0,"adj":[]},"A":{"lat":0.0,"lon":0.0,"adj":[{"nodeId":"B","#));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["C"]["adj"].as_array().unwrap().len(), 0);
        assert_eq!(value["B"]["adj"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn pretty_reads_back_identically() {
        let g = sample_graph();
        let mut w = JsonWriter::new(Vec::new()).pretty(true);
        w.write_graph(&g).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        let bytes = w.into_inner().unwrap();
        assert!(bytes.contains(&b'\n'));
        assert_eq!(read_json(Cursor::new(bytes)).unwrap(), g);
    }

    #[test]
    fn deterministic_bytes() {
        let dir = tmp();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        write_json_file(&sample_graph(), &a).unwrap();
        write_json_file(&sample_graph(), &b).unwrap();
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    #[test]
    fn malformed_document_rejected() {
        let err = read_json(Cursor::new(r#"{"A": {"lat": 0.0}}"#)).unwrap_err();
        assert!(matches!(err, OutputError::Json(_)));
    }

    #[test]
    fn missing_file() {
        let dir = tmp();
        let err = read_json_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::helpers::sample_graph;
    use crate::csv::CsvEdgeWriter;
    use crate::row::edge_rows;
    use crate::writer::GraphWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn rows_follow_graph_order() {
        let g = sample_graph();
        let pairs: Vec<_> = edge_rows(&g).map(|r| (r.from, r.to)).collect();
        assert_eq!(pairs, [("A", "B"), ("B", "A"), ("B", "C")]);
    }

    #[test]
    fn csv_headers_and_rows() {
        let dir = tmp();
        let path = dir.path().join("edges.csv");
        let g = sample_graph();
        let mut w = CsvEdgeWriter::create(&path).unwrap();
        w.write_graph(&g).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["from", "to", "distance_miles", "time_hours"]);

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[2][0], "B");
        assert_eq!(&rows[2][1], "C");

        let expected = &g.get("B").unwrap().edges()[1];
        let distance: f64 = rows[2][2].parse().unwrap();
        let time: f64 = rows[2][3].parse().unwrap();
        assert_eq!(distance, expected.distance_miles());
        assert_eq!(time, expected.time_hours());
    }

    #[test]
    fn in_memory_writer() {
        let mut w = CsvEdgeWriter::from_writer(Vec::new());
        w.write_graph(&sample_graph()).unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("from,to,distance_miles,time_hours\nA,B,"));
    }
}
