use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use ::arrow::array::{StringArray, UInt8Array, UInt32Array};
use ::arrow::datatypes::{DataType, Field, Schema};
use ::arrow::record_batch::RecordBatch;
use ::parquet::arrow::ArrowWriter;
use crate::error::Result;
use crate::models::ReviewRecord;

pub struct ParquetConverter;

fn text_column(reviews: &[ReviewRecord], field: impl Fn(&ReviewRecord) -> &str) -> StringArray {
    reviews.iter().map(|r| Some(field(r))).collect()
}

impl ParquetConverter {
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("platform", DataType::Utf8, false),
            Field::new("author", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("rating", DataType::UInt8, false),
            Field::new("version", DataType::Utf8, false),
            Field::new("vote_sum", DataType::UInt32, false),
            Field::new("vote_count", DataType::UInt32, false),
            Field::new("updated", DataType::Utf8, false),
            Field::new("review_id", DataType::Utf8, false),
            Field::new("country", DataType::Utf8, false),
            Field::new("lang", DataType::Utf8, false),
            Field::new("thumbs_up_count", DataType::UInt32, true),
            Field::new("reply_content", DataType::Utf8, true),
            Field::new("replied_at", DataType::Utf8, true),
        ])
    }

    pub fn convert_reviews_to_parquet(reviews: &[ReviewRecord], output_path: &Path) -> Result<()> {
        let schema = Arc::new(Self::schema());

        let platforms: StringArray = reviews.iter()
            .map(|r| Some(r.platform.as_str()))
            .collect();

        let ratings: UInt8Array = reviews.iter()
            .map(|r| Some(r.rating))
            .collect();

        let vote_sums: UInt32Array = reviews.iter()
            .map(|r| Some(r.vote_sum))
            .collect();

        let vote_counts: UInt32Array = reviews.iter()
            .map(|r| Some(r.vote_count))
            .collect();

        let thumbs_up: UInt32Array = reviews.iter()
            .map(|r| r.thumbs_up_count)
            .collect();

        let reply_content: StringArray = reviews.iter()
            .map(|r| r.reply_content.as_deref())
            .collect();

        let replied_at: StringArray = reviews.iter()
            .map(|r| r.replied_at.as_deref())
            .collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(platforms),
                Arc::new(text_column(reviews, |r| r.author.as_str())),
                Arc::new(text_column(reviews, |r| r.title.as_str())),
                Arc::new(text_column(reviews, |r| r.content.as_str())),
                Arc::new(ratings),
                Arc::new(text_column(reviews, |r| r.version.as_str())),
                Arc::new(vote_sums),
                Arc::new(vote_counts),
                Arc::new(text_column(reviews, |r| r.updated.as_str())),
                Arc::new(text_column(reviews, |r| r.review_id.as_str())),
                Arc::new(text_column(reviews, |r| r.country.as_str())),
                Arc::new(text_column(reviews, |r| r.lang.as_str())),
                Arc::new(thumbs_up),
                Arc::new(reply_content),
                Arc::new(replied_at),
            ],
        )?;

        let file = File::create(output_path)?;
        let mut writer = ArrowWriter::try_new(file, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::parquet::file::reader::{FileReader, SerializedFileReader};
    use crate::models::Platform;

    #[test]
    fn writes_one_row_per_review() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.parquet");
        let mut reply = ReviewRecord::new(Platform::GooglePlay, "b", "답변 있음", 2);
        reply.reply_content = Some("확인했습니다".to_string());
        let reviews = vec![ReviewRecord::new(Platform::AppStore, "a", "내용", 5), reply];

        ParquetConverter::convert_reviews_to_parquet(&reviews, &path).unwrap();

        let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
        let metadata = reader.metadata();
        assert_eq!(metadata.file_metadata().num_rows(), 2);
        assert_eq!(metadata.file_metadata().schema_descr().num_columns(), 15);
    }
}
