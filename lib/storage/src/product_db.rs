//! MySQL product database
//!
//! Resolution requests arrive with Chinese attribute names; this adapter
//! maps them onto the physical columns of the catalog schema. Lookups walk
//! base info → material row → size row, and a missing product or row yields
//! an empty field set, never an error. NULL and blank columns are skipped so
//! that field presence always means a usable value.

use async_trait::async_trait;
use attrx_core::capability::{CapabilityError, CapabilityResult, FieldSource, FieldValues};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use thiserror::Error;
use tracing::{debug, warn};

const BASE_TABLE: &str = "intrinsic_attributes_productbaseinfo";
const MATERIAL_TABLE: &str = "intrinsic_attributes_productmaterial";
const SIZE_TABLE: &str = "intrinsic_attributes_productsize";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No column mapped for attribute: {0}")]
    UnmappedAttribute(String),
}

/// Map an attribute name onto a material-table column.
fn material_column(name: &str) -> Option<&'static str> {
    match name {
        "鞋面材质" => Some("upper"),
        "内里材质" => Some("lining"),
        "鞋底材质" => Some("outsole"),
        "鞋垫材质" => Some("insole"),
        _ => None,
    }
}

/// Map an attribute name onto a size-table column.
fn size_column(name: &str) -> Option<&'static str> {
    match name {
        "后跟高" | "鞋跟高度" | "heel_height" => Some("heel_height"),
        "靴筒高度" | "tube_height" => Some("boot_shaft_height"),
        "鞋底厚度" | "platform_height" => Some("platform_height"),
        _ => None,
    }
}

pub struct ProductDatabase {
    pool: MySqlPool,
}

impl ProductDatabase {
    /// Connect lazily: the URL is validated now, the first query opens the
    /// connection. An unreachable database then degrades each lookup to an
    /// empty result through the capability error path.
    pub fn connect_lazy(url: &str) -> crate::Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    /// Resolve the internal product id and original product number.
    async fn base_info(&self, product_number: &str) -> sqlx::Result<Option<(i64, String)>> {
        let row: Option<MySqlRow> = sqlx::query(&format!(
            "SELECT id, original_product_number FROM {BASE_TABLE} WHERE product_number = ? LIMIT 1"
        ))
        .bind(product_number)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: i64 = row.try_get("id")?;
        let original: Option<String> = row.try_get("original_product_number")?;
        Ok(Some((id, original.unwrap_or_else(|| product_number.to_string()))))
    }

    async fn material_row(&self, product_id: i64) -> sqlx::Result<Option<MySqlRow>> {
        sqlx::query(&format!(
            "SELECT upper, lining, outsole, insole FROM {MATERIAL_TABLE} WHERE product_id = ? LIMIT 1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn size_row(&self, original_product_number: &str) -> sqlx::Result<Option<MySqlRow>> {
        sqlx::query(&format!(
            "SELECT heel_height, boot_shaft_height, platform_height FROM {SIZE_TABLE} \
             WHERE original_product_number = ? LIMIT 1"
        ))
        .bind(original_product_number)
        .fetch_optional(&self.pool)
        .await
    }

    /// All distinct known values of an attribute across the catalog.
    /// Attributes with no mapped column yield an error, not an empty list,
    /// so callers can tell "unmapped" from "no data".
    pub async fn known_values(&self, attribute_name: &str) -> crate::Result<Vec<String>> {
        let (table, column) = if let Some(column) = material_column(attribute_name) {
            (MATERIAL_TABLE, column)
        } else if let Some(column) = size_column(attribute_name) {
            (SIZE_TABLE, column)
        } else {
            return Err(StorageError::UnmappedAttribute(attribute_name.to_string()));
        };

        let rows = sqlx::query(&format!(
            "SELECT DISTINCT `{column}` AS value FROM {table} \
             WHERE `{column}` IS NOT NULL AND `{column}` != '' ORDER BY `{column}`"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value: Option<String> = row.try_get("value")?;
            if let Some(value) = value {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn collect(row: &MySqlRow, requested: &[&str], map: fn(&str) -> Option<&'static str>, out: &mut FieldValues) {
        for name in requested {
            let Some(column) = map(name) else { continue };
            match row.try_get::<Option<String>, _>(column) {
                Ok(Some(value)) => out.insert(*name, value),
                Ok(None) => {}
                Err(err) => warn!("failed to read column {column}: {err}"),
            }
        }
    }
}

#[async_trait]
impl FieldSource for ProductDatabase {
    async fn fetch_fields(
        &self,
        product_id: &str,
        field_names: &[&str],
    ) -> CapabilityResult<FieldValues> {
        let mut fields = FieldValues::new();

        let base = self
            .base_info(product_id)
            .await
            .map_err(|e| CapabilityError::DataSource(e.to_string()))?;
        let Some((internal_id, original_number)) = base else {
            debug!("product not found: {product_id}");
            return Ok(fields);
        };

        let wants_material = field_names.iter().any(|n| material_column(n).is_some());
        let wants_size = field_names.iter().any(|n| size_column(n).is_some());

        if wants_material {
            let row = self
                .material_row(internal_id)
                .await
                .map_err(|e| CapabilityError::DataSource(e.to_string()))?;
            match row {
                Some(row) => Self::collect(&row, field_names, material_column, &mut fields),
                None => debug!("no material row for product {product_id}"),
            }
        }

        if wants_size {
            let row = self
                .size_row(&original_number)
                .await
                .map_err(|e| CapabilityError::DataSource(e.to_string()))?;
            match row {
                Some(row) => Self::collect(&row, field_names, size_column, &mut fields),
                None => debug!("no size row for product {product_id}"),
            }
        }

        Ok(fields)
    }
}
