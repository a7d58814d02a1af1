use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Write a parquet shard shaped like an (audio, label) dataset.
pub fn write_parquet_shard(path: &Path, num_rows: usize) {
    let audio: StringArray = (0..num_rows)
        .map(|i| Some(format!("sample_{i}.wav")))
        .collect();
    let labels: Int32Array = (0..num_rows).map(|i| Some((i % 10) as i32)).collect();
    let batch = RecordBatch::try_from_iter([
        ("audio", Arc::new(audio) as ArrayRef),
        ("label", Arc::new(labels) as ArrayRef),
    ])
    .expect("record batch");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let file = fs::File::create(path).expect("create shard file");
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");
}
