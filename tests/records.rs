use anyhow::Result;
use slashcsv::testing::{TempDirPath, TempFilePath, mock_csv_file, read_output};
use slashcsv::{
    CsvError, CsvReader, ReadAll, Window, csv_record, read_all, read_all_from, read_all_path,
    read_all_vec, write_all, write_all_path, write_slice,
};
use std::io::Cursor;

csv_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Video {
        pub bvid: String,
        pub title: String,
        pub play_count: u64,
        pub duration: f32,
    }
}

fn videos(n: u64) -> Vec<Video> {
    (0..n)
        .map(|i| Video {
            bvid: format!("BV{i:04}"),
            title: format!("episode {i}, part \"{}\"", i % 3),
            play_count: i * 100,
            duration: i as f32 + 0.5,
        })
        .collect()
}

#[test]
fn round_trip_through_memory() -> Result<()> {
    let input = videos(5);
    let mut buf = Vec::new();
    assert_eq!(write_all(&mut buf, input.clone())?, 5);

    let output: Vec<Video> = read_all::<Video, _>(buf.as_slice())?.collect::<Result<_>>()?;
    assert_eq!(output, input);
    Ok(())
}

#[test]
fn write_all_accepts_lazy_sequences() -> Result<()> {
    let mut buf = Vec::new();
    let n = write_all(&mut buf, videos(3).into_iter().filter(|v| v.play_count > 0))?;
    assert_eq!(n, 2);
    assert_eq!(String::from_utf8(buf)?.lines().count(), 3);
    Ok(())
}

#[test]
fn write_slice_borrows_records() -> Result<()> {
    let input = videos(2);
    let mut buf = Vec::new();
    assert_eq!(write_slice(&mut buf, &input)?, 2);
    assert_eq!(input.len(), 2);
    assert!(String::from_utf8(buf)?.starts_with("Bvid,Title,PlayCount,Duration\n"));
    Ok(())
}

#[test]
fn empty_sequence_writes_nothing() -> Result<()> {
    let mut buf = Vec::new();
    assert_eq!(write_all(&mut buf, Vec::<Video>::new())?, 0);
    assert!(buf.is_empty());
    Ok(())
}

#[test]
fn round_trip_through_path() -> Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.path().join("out").join("videos.csv");
    let input = videos(4);
    assert_eq!(write_all_path(&path, input.clone())?, 4);
    assert_eq!(read_all_vec::<Video>(&path)?, input);
    Ok(())
}

#[test]
fn read_all_is_lazy_and_can_stop_early() -> Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("videos.csv");
    write_all_path(&path, videos(10))?;

    let first_two: Vec<Video> = read_all_path::<Video>(&path)?
        .take(2)
        .collect::<Result<_>>()?;
    assert_eq!(first_two, videos(2));
    Ok(())
}

#[test]
fn read_all_from_byte_stream() -> Result<()> {
    let mut stream = Cursor::new(b"bvid,play_count\nBV1,7\n".to_vec());
    let rows: Vec<Video> = read_all_from::<Video, _>(&mut stream)?.collect::<Result<_>>()?;
    assert_eq!(rows[0].play_count, 7);
    // caller still owns the stream
    assert_eq!(stream.into_inner().len(), 22);
    Ok(())
}

#[test]
fn read_all_stops_after_error() -> Result<()> {
    let mut rows = read_all::<Video, _>("bvid,nope\nBV1,1\nBV2,2\n".as_bytes())?;
    let first = rows.next().expect("one item");
    let err = first.err().expect("must fail");
    assert!(matches!(
        err.downcast_ref::<CsvError>(),
        Some(CsvError::UnknownColumn { .. })
    ));
    assert!(rows.next().is_none());
    assert!(rows.next().is_none());
    Ok(())
}

#[test]
fn read_all_vec_reports_missing_file() {
    let err = read_all_vec::<Video>("/no/such/videos.csv").err().expect("must fail");
    assert!(err.downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn read_all_vec_annotates_header_errors() -> Result<()> {
    let file = mock_csv_file("bvid,unknown_column\nBV1,x\n")?;
    let err = read_all_vec::<Video>(file.path()).err().expect("must fail");
    let message = format!("{err:?}");
    assert!(message.contains("bind CSV header of"));
    assert!(!message.contains("read CSV record"));
    assert!(err.downcast_ref::<CsvError>().is_some());
    Ok(())
}

#[test]
fn read_all_vec_numbers_row_errors() -> Result<()> {
    let file = TempFilePath::new()?;
    std::fs::write(file.path(), b"bvid\nBV1\nBV2\n\xff\n")?;
    let err = read_all_vec::<Video>(file.path()).err().expect("must fail");
    assert!(format!("{err:?}").contains("read CSV record #3"));
    assert!(err.downcast_ref::<std::io::Error>().is_some());
    Ok(())
}

#[test]
fn windowed_session_wrapped_in_read_all() -> Result<()> {
    let mut buf = Vec::new();
    write_all(&mut buf, videos(5))?;
    let reader = CsvReader::<Video, _>::from_reader(buf.as_slice())?
        .with_window(Window::default().rows(1, 2))?;
    let ids: Vec<String> = ReadAll::new(reader)
        .map(|v| v.map(|v| v.bvid))
        .collect::<Result<_>>()?;
    assert_eq!(ids, ["BV0001", "BV0002"]);
    Ok(())
}

#[test]
fn header_written_verbatim() -> Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("v.csv");
    write_all_path(&path, videos(1))?;
    let text = read_output(&path)?;
    assert_eq!(
        text,
        "Bvid,Title,PlayCount,Duration\nBV0000,\"episode 0, part \\\"0\\\"\",0,0.5\n"
    );
    Ok(())
}
