// Instruction text for the single-pass report extraction.

use crate::schema::MonthlyRecord;

pub const EXTRACTION_INSTRUCTIONS: &str = r#"
You are a data extraction specialist. Extract statistics from the attached Vietnamese public health report and return them as ONE JSON object.

## SCOPE
The report covers a SINGLE month. Most figures are in the section "I. Tình hình dịch bệnh trong tháng"; accident figures have their own sections.

## OUTPUT FORMAT
Return the JSON object inside a ```json fenced code block. Do not write anything outside the block.

## FIELDS

### "trends" (line chart)
Every array holds exactly ONE item for the reporting month.
- "labels": ["PlaceholderMonth"]. The application replaces this placeholder.
- "sxh", "tcm", "soi": cases of "Sốt xuất huyết", "Tay chân miệng" and "Sởi".
- "dauMuaKhi", "bachHau", "sars", "cumAH5N1", "cumAH1N1": cases of the additional diseases.

### "composition" (pie chart)
- "labels": always ["Sốt xuất huyết", "Tay chân miệng", "Sởi"].
- "data": the three case counts, the same numbers as in "trends".

### "highlights" (stat cards)
- "tongKhamSo": "Tổng số lượt khám bệnh".
- "khamNoiTru": "khám và điều trị nội trú".
- "tieuChay": "Tiêu chảy".
- "hiv": "HIV/AIDS".
- "naoMoCau": "Não mô cầu".

### "accidents"
- "trafficAccidents": "total"; "localCases" ("Xảy ra trên địa bàn") and "localPercentage"; "alcoholCases" ("có nồng độ cồn trong máu") and "alcoholPercentage".
- "occupationalAccidents": "total", "injuries", "deaths".

### "additionalDiseases"
"dauMuaKhi" (Đậu mùa khỉ), "bachHau" (Bạch hầu), "sars" (SARS), "cumAH5N1" (Cúm A(H5N1)), "cumAH1N1" (Cúm A(H1N1)).

## RULES
- Counts are whole, non-negative numbers. Percentages may have one decimal.
- If a figure is not in the report, use 0.
"#;

pub const EXTRACTION_EXAMPLE: &str = r#"
## EXAMPLE OUTPUT
```json
{
  "trends": {
    "labels": ["PlaceholderMonth"],
    "sxh": [120],
    "tcm": [60],
    "soi": [10],
    "dauMuaKhi": [0],
    "bachHau": [0],
    "sars": [0],
    "cumAH5N1": [0],
    "cumAH1N1": [2]
  },
  "composition": {
    "labels": ["Sốt xuất huyết", "Tay chân miệng", "Sởi"],
    "data": [120, 60, 10]
  },
  "highlights": {
    "tongKhamSo": 123456,
    "khamNoiTru": 4567,
    "tieuChay": 789,
    "hiv": 12,
    "naoMoCau": 3
  },
  "accidents": {
    "trafficAccidents": {
      "total": 45,
      "localCases": 35,
      "localPercentage": 77.8,
      "alcoholCases": 15,
      "alcoholPercentage": 33.3
    },
    "occupationalAccidents": { "total": 8, "injuries": 6, "deaths": 2 }
  },
  "additionalDiseases": {
    "dauMuaKhi": 0,
    "bachHau": 0,
    "sars": 0,
    "cumAH5N1": 0,
    "cumAH1N1": 2
  }
}
```
"#;

/// Full prompt: instructions, the JSON schema of a record, and a worked example.
pub fn extraction_prompt() -> String {
    let schema = MonthlyRecord::schema_as_json().unwrap_or_default();
    format!(
        "{}\n## JSON SCHEMA\n{}\n{}",
        EXTRACTION_INSTRUCTIONS.trim(),
        schema,
        EXTRACTION_EXAMPLE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_prompt_contains_schema_and_example() {
        let prompt = extraction_prompt();
        assert!(prompt.contains("PlaceholderMonth"));
        assert!(prompt.contains("## JSON SCHEMA"));
        assert!(prompt.contains("\"additionalDiseases\""));
        assert!(prompt.contains("Tình hình dịch bệnh trong tháng"));
    }

    #[test]
    fn test_example_is_parseable() {
        let record = parser::parse(EXTRACTION_EXAMPLE).unwrap();
        assert_eq!(record.trends.sxh, vec![120]);
        assert_eq!(record.accidents.traffic_accidents.total, 45);
        assert_eq!(record.additional_diseases.cum_ah1n1, 2);
    }
}
