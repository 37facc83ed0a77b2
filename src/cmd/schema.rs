use structjson::reflect::{FieldDesc, FieldKind, ReflectError, Result, Table};

use crate::cmd::playlist::ALL;
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Only print the table with this name.
	#[arg(long)]
	pub table: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print the layout of the built-in tables.
pub fn run(args: Args) -> Result<()> {
	let Args { table, json } = args;

	let tables: Vec<&Table> = match &table {
		Some(name) => ALL.iter().copied().filter(|item| item.name == name.as_str()).collect(),
		None => ALL.to_vec(),
	};
	if tables.is_empty() {
		return Err(ReflectError::InvalidTable {
			table: "schema",
			reason: format!("no built-in table named {}", table.unwrap_or_default()),
		});
	}
	for item in &tables {
		item.validate()?;
	}

	if json {
		let payload: Vec<_> = tables.iter().map(|item| table_json(item)).collect();
		return emit_json(&payload);
	}

	for item in tables {
		println!("table: {}", item.name);
		println!("size: {}", item.size);
		println!("field_count: {}", item.fields().count());
		for field in item.fields() {
			println!("  {}", field_line(field));
		}
	}
	Ok(())
}

fn field_line(field: &FieldDesc) -> String {
	let mut line = format!("{} {} @{} +{}", field.name, kind_label(field), field.offset, field.size);
	if let FieldKind::Array { count_field, .. } = field.kind {
		line.push_str(&format!(" count={count_field}"));
	}
	line.push_str(if field.nullable { " nullable" } else { " required" });
	line
}

fn kind_label(field: &FieldDesc) -> String {
	match field.kind {
		FieldKind::Object(nested) => format!("object<{}>", nested.name),
		FieldKind::Array { elem, .. } => format!("array<{}>", elem.name),
		_ => field.kind_tag().as_str().to_owned(),
	}
}

fn table_json(table: &Table) -> TableJson {
	TableJson {
		name: table.name,
		size: table.size,
		fields: table
			.fields()
			.map(|field| FieldJson {
				name: field.name,
				kind: kind_label(field),
				offset: field.offset,
				size: field.size,
				nullable: field.nullable,
				count_field: match field.kind {
					FieldKind::Array { count_field, .. } => Some(count_field),
					_ => None,
				},
			})
			.collect(),
	}
}

#[derive(serde::Serialize)]
struct TableJson {
	name: &'static str,
	size: usize,
	fields: Vec<FieldJson>,
}

#[derive(serde::Serialize)]
struct FieldJson {
	name: &'static str,
	kind: String,
	offset: usize,
	size: usize,
	nullable: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	count_field: Option<&'static str>,
}
