//! Random tabular data for the generate and sample endpoints.

use serde_json::{json, Map, Value};

/// Column data types accepted by `/api/data/generate`.
pub const DATA_TYPES: [&str; 10] = [
    "string", "integer", "float", "date", "boolean", "email", "name", "address", "product", "price",
];

/// Sample datasets served by `/api/data/sample/{sample_type}`.
pub const SAMPLE_TYPES: [&str; 3] = ["users", "products", "transactions"];

fn column_names(data_type: &str) -> &'static [&'static str] {
    match data_type {
        "string" => &["description", "comments", "category", "department", "status", "type"],
        "integer" => &["id", "quantity", "count", "age", "code", "stock"],
        "float" => &["amount", "percentage", "ratio", "value", "score"],
        "date" => &["date", "created_at", "updated_at", "expiry_date", "birth_date"],
        "boolean" => &["is_active", "is_valid", "is_completed", "approved", "in_stock"],
        "email" => &["email", "contact_email", "support_email", "billing_email"],
        "name" => &["full_name", "first_name", "last_name", "user_name", "contact_name"],
        "address" => &["address", "street", "city", "state", "country", "zip_code"],
        "product" => &["product_name", "sku", "model", "brand", "category"],
        "price" => &["price", "cost", "retail_price", "discount", "tax"],
        _ => &[],
    }
}

/// A header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Random table with `columns` columns. `data_types` is used only when
    /// it has exactly one entry per column; otherwise types are random.
    pub fn generate(rows: usize, columns: usize, data_types: &[String]) -> Self {
        let types: Vec<String> = if data_types.len() == columns {
            data_types.to_vec()
        } else {
            (0..columns).map(|_| pick(&DATA_TYPES).to_string()).collect()
        };

        let mut headers: Vec<String> = Vec::with_capacity(columns);
        for (i, data_type) in types.iter().enumerate() {
            let names = column_names(data_type);
            if names.is_empty() {
                headers.push(format!("column_{}", i + 1));
                continue;
            }
            let mut name = pick(names).to_string();
            while headers.contains(&name) {
                name = format!("{name}_{}", i + 1);
            }
            headers.push(name);
        }

        Self::fill(headers, &types, rows)
    }

    /// Fixed-schema sample dataset, or `None` for an unknown sample type.
    pub fn sample(sample_type: &str, rows: usize) -> Option<Self> {
        let (headers, types): ([&str; 5], [&str; 5]) = match sample_type {
            "users" => (
                ["id", "full_name", "email", "registration_date", "is_active"],
                ["integer", "name", "email", "date", "boolean"],
            ),
            "products" => (
                ["id", "product_name", "price", "stock", "in_stock"],
                ["integer", "product", "price", "integer", "boolean"],
            ),
            "transactions" => (
                ["id", "user_id", "transaction_date", "amount", "status"],
                ["integer", "integer", "date", "price", "string"],
            ),
            _ => return None,
        };
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let types: Vec<String> = types.iter().map(|t| t.to_string()).collect();
        Some(Self::fill(headers, &types, rows))
    }

    fn fill(headers: Vec<String>, types: &[String], rows: usize) -> Self {
        let rows = (0..rows)
            .map(|_| types.iter().map(|t| value_for(t)).collect())
            .collect();
        Self { headers, rows }
    }

    /// `{"metadata": {rows, columns, headers}, "data": [{header: value}]}`.
    pub fn to_json(&self) -> Value {
        let data: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let record: Map<String, Value> = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(record)
            })
            .collect();
        json!({
            "metadata": {
                "rows": self.rows.len(),
                "columns": self.headers.len(),
                "headers": self.headers,
            },
            "data": data,
        })
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_csv_row(&mut out, self.headers.iter().map(String::as_str));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            write_csv_row(&mut out, cells.iter().map(String::as_str));
        }
        out
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

fn write_csv_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells
        .map(|cell| {
            if cell.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.to_string()
            }
        })
        .collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Split CSV text into records. Quoted fields may contain commas, doubled
/// quotes and line breaks; blank lines are skipped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    // Set once the current record has any content, even an empty `""`.
    let mut touched = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', _) => {
                quoted = !quoted;
                touched = true;
            }
            (',', false) => {
                record.push(std::mem::take(&mut field));
                touched = true;
            }
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                if touched || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                touched = false;
            }
            _ => field.push(c),
        }
    }
    if touched || !field.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

/// Column dtype in the naming pandas uses: `int64`, `float64`, `bool` or
/// `object`. Empty cells are missing values, which turn integer columns
/// into `float64`.
pub fn column_type<'a>(cells: impl IntoIterator<Item = &'a str>) -> &'static str {
    let all: Vec<&str> = cells.into_iter().collect();
    let missing = all.iter().any(|c| c.is_empty());
    let present: Vec<&str> = all.into_iter().filter(|c| !c.is_empty()).collect();

    if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        if missing || present.is_empty() {
            "float64"
        } else {
            "int64"
        }
    } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        "float64"
    } else if !missing && present.iter().all(|c| matches!(*c, "True" | "False" | "true" | "false")) {
        "bool"
    } else {
        "object"
    }
}

/// Random value of `data_type`; unknown types get a placeholder string.
pub fn value_for(data_type: &str) -> Value {
    match data_type {
        "string" => {
            let len = fastrand::usize(5..=15);
            let s: String = (0..len)
                .map(|_| if fastrand::u8(..10) == 0 { ' ' } else { fastrand::alphabetic() })
                .collect();
            Value::String(s.trim().to_string())
        }
        "integer" => json!(fastrand::u32(1..=1000)),
        "float" => json!(round2(1.0 + fastrand::f64() * 99.0)),
        "date" => Value::String(format!(
            "{}-{:02}-{:02}",
            fastrand::u16(2020..=2022),
            fastrand::u8(1..=12),
            fastrand::u8(1..=28)
        )),
        "boolean" => Value::Bool(fastrand::bool()),
        "email" => {
            let user: String = (0..fastrand::usize(5..=10)).map(|_| fastrand::lowercase()).collect();
            let domain = pick(&["example.com", "test.org", "company.net", "mail.co"]);
            Value::String(format!("{user}@{domain}"))
        }
        "name" => {
            let first = pick(&["John", "Jane", "Alice", "Bob", "Maria", "David", "Sarah", "Michael"]);
            let last = pick(&["Smith", "Johnson", "Brown", "Lee", "Garcia", "Miller", "Davis", "Wilson"]);
            Value::String(format!("{first} {last}"))
        }
        "address" => {
            let street = pick(&["Main St", "Oak Ave", "Park Rd", "Maple Ln", "Cedar Blvd"]);
            let city = pick(&["Springfield", "Rivertown", "Oakville", "Maplewood", "Franklin"]);
            Value::String(format!("{} {street}, {city}", fastrand::u16(100..=999)))
        }
        "product" => {
            let adjective = pick(&["Premium", "Deluxe", "Basic", "Advanced", "Smart", "Ultra"]);
            let product = pick(&["Widget", "Gadget", "Tool", "Device", "System", "Solution"]);
            Value::String(format!("{adjective} {product}"))
        }
        "price" => Value::String(format!("${:.2}", 9.99 + fastrand::f64() * 490.0)),
        _ => Value::String(format!("Sample-{}", fastrand::u16(1000..=9999))),
    }
}

fn pick(items: &[&'static str]) -> &'static str {
    items[fastrand::usize(..items.len())]
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
