use crate::error::FieldErrors;
use crate::marvel::QueryParams;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_AN_INTEGER: &str = "A valid integer is required.";

const MAX_LIMIT: i64 = 100;
const MAX_TITLE_LENGTH: usize = 200;

/// 同名参数取最后一个值
fn last_value<'a>(query: &'a [(String, String)], name: &str) -> Option<&'a str> {
    query
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn integer_field(
    query: &[(String, String)],
    name: &str,
    min: i64,
    max: Option<i64>,
    errors: &mut FieldErrors,
) -> Option<i64> {
    // 空字符串视同未提供
    let raw = last_value(query, name).filter(|raw| !raw.is_empty())?;

    let value = match raw.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            errors.insert(name.into(), vec![NOT_AN_INTEGER.into()]);
            return None;
        }
    };

    if value < min {
        errors.insert(
            name.into(),
            vec![format!("Ensure this value is greater than or equal to {}.", min)],
        );
        return None;
    }
    if let Some(max) = max.filter(|max| value > *max) {
        errors.insert(
            name.into(),
            vec![format!("Ensure this value is less than or equal to {}.", max)],
        );
        return None;
    }

    Some(value)
}

/// 分页参数：limit ∈ [1, 100]，offset ≥ 0，均可省略
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    fn collect(query: &[(String, String)], errors: &mut FieldErrors) -> Self {
        Self {
            limit: integer_field(query, "limit", 1, Some(MAX_LIMIT), errors),
            offset: integer_field(query, "offset", 0, None, errors),
        }
    }

    pub fn validate(query: &[(String, String)]) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let pagination = Self::collect(query, &mut errors);
        if errors.is_empty() {
            Ok(pagination)
        } else {
            Err(errors)
        }
    }

    /// 只包含调用方显式给出的字段，其余沿用接口默认值
    pub fn into_params(self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(limit) = self.limit {
            params.insert("limit".into(), limit.to_string());
        }
        if let Some(offset) = self.offset {
            params.insert("offset".into(), offset.to_string());
        }
        params
    }
}

/// 按标题搜索的查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleQuery {
    pub title: String,
    pub pagination: Pagination,
}

impl TitleQuery {
    pub fn validate(query: &[(String, String)]) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let pagination = Pagination::collect(query, &mut errors);

        let title = match last_value(query, "title").map(str::trim) {
            None => {
                errors.insert("title".into(), vec![REQUIRED.into()]);
                None
            }
            Some("") => {
                errors.insert("title".into(), vec![BLANK.into()]);
                None
            }
            Some(t) if t.chars().count() > MAX_TITLE_LENGTH => {
                errors.insert(
                    "title".into(),
                    vec![format!(
                        "Ensure this field has no more than {} characters.",
                        MAX_TITLE_LENGTH
                    )],
                );
                None
            }
            Some(t) => Some(t.to_string()),
        };

        match title {
            Some(title) if errors.is_empty() => Ok(Self { title, pagination }),
            _ => Err(errors),
        }
    }

    pub fn into_params(self) -> QueryParams {
        let mut params = self.pagination.into_params();
        params.insert("title".into(), self.title);
        params
    }
}
