#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnType {
    Boolean,
    Varchar,
    Double,
    Integer,
    Date,
    DateTime,
    Blob,
    Geometry,
    /// A declared type outside the GeoPackage list, such as `NUMERIC` or
    /// `VARCHAR(20)`. Values are encoded by their storage class.
    Other,
}

#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
}

#[derive(Clone, Debug)]
pub(crate) struct ColumnSpecs {
    pub(crate) primary_key: Option<String>,
    pub(crate) other_columns: Vec<ColumnSpec>,
}
