use crate::domain::models::extraction::{PageData, Record};
use anyhow::Result;
use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

/// 导出服务
///
/// 负责将提取结果序列化为JSON和CSV
pub struct ExportService;

impl ExportService {
    /// 按标签对齐的整页CSV
    ///
    /// 表头为标签列表，数据行对齐各标签的第i个值，短列补空，
    /// 所有字段无条件加引号
    pub fn tag_table_csv(data: &PageData) -> Result<String> {
        if data.is_empty() {
            return Ok(String::new());
        }

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(vec![]);

        writer.write_record(data.columns.iter().map(|c| c.tag.as_str()))?;

        for row in 0..data.max_rows() {
            let record: Vec<&str> = data
                .columns
                .iter()
                .map(|c| c.values.get(row).map(String::as_str).unwrap_or(""))
                .collect();
            writer.write_record(&record)?;
        }

        let bytes = writer.into_inner()?;
        Ok(String::from_utf8(bytes)?.trim_end().to_string())
    }

    /// 选择器记录CSV
    ///
    /// 列为所有记录键的并集，按首次出现顺序排列，缺失单元格为空
    pub fn records_csv(records: &[Record]) -> Result<String> {
        if records.is_empty() {
            return Ok(String::new());
        }

        let mut columns: Vec<&str> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.contains(&key) {
                    columns.push(key);
                }
            }
        }

        let mut writer = WriterBuilder::new().from_writer(vec![]);
        writer.write_record(&columns)?;

        for record in records {
            let row: Vec<&str> = columns
                .iter()
                .map(|col| record.get(col).unwrap_or(""))
                .collect();
            writer.write_record(&row)?;
        }

        let bytes = writer.into_inner()?;
        Ok(String::from_utf8(bytes)?.trim_end().to_string())
    }

    /// 将所有标签的值平铺为单个列表（按列顺序）
    pub fn flatten_for_ui(data: &PageData) -> Vec<String> {
        data.columns
            .iter()
            .flat_map(|c| c.values.iter().cloned())
            .collect()
    }

    /// 标签到值数组的JSON对象，保持标签发现顺序
    pub fn json_by_tag(data: &PageData) -> Value {
        let mut map = serde_json::Map::new();
        for column in &data.columns {
            map.insert(
                column.tag.clone(),
                Value::Array(
                    column
                        .values
                        .iter()
                        .map(|v| Value::String(v.clone()))
                        .collect(),
                ),
            );
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> PageData {
        let mut data = PageData::default();
        data.push_value("h1", "Title".to_string());
        data.push_value("p", "First".to_string());
        data.push_value("p", "Second".to_string());
        data.push_value("p", "He said \"hi\"".to_string());
        data
    }

    #[test]
    fn test_tag_table_csv_pads_and_quotes() {
        let csv = ExportService::tag_table_csv(&sample_page()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "\"h1\",\"p\"");
        assert_eq!(lines[1], "\"Title\",\"First\"");
        // h1 ran out of values, so its cell is an empty quoted field
        assert_eq!(lines[2], "\"\",\"Second\"");
        assert_eq!(lines[3], "\"\",\"He said \"\"hi\"\"\"");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_tag_table_csv_empty_page() {
        let csv = ExportService::tag_table_csv(&PageData::default()).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_records_csv_unions_columns() {
        let mut first = Record::default();
        first.insert("tag_name".to_string(), "a".to_string());
        first.insert("href".to_string(), "/one".to_string());

        let mut second = Record::default();
        second.insert("tag_name".to_string(), "img".to_string());
        second.insert("src".to_string(), "/cat.png".to_string());

        let csv = ExportService::records_csv(&[first, second]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "tag_name,href,src");
        assert_eq!(lines[1], "a,/one,");
        assert_eq!(lines[2], "img,,/cat.png");
    }

    #[test]
    fn test_flatten_for_ui_is_column_major() {
        let flat = ExportService::flatten_for_ui(&sample_page());
        assert_eq!(flat, vec!["Title", "First", "Second", "He said \"hi\""]);
    }

    #[test]
    fn test_json_by_tag_keeps_order() {
        let json = ExportService::json_by_tag(&sample_page());
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["h1", "p"]);
        assert_eq!(json["p"][1], "Second");
    }
}
