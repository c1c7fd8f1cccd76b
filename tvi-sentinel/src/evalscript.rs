use std::fmt;
use std::str::FromStr;

/// How masked (out-of-swath / cloud-masked) pixels are encoded in the
/// returned FLOAT32 raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskedAs {
    /// `NaN` - used for per-pixel stacks so no-data survives the transport.
    Nan,
    /// `0.0` - the convention the area-mean pipeline filters out on arrival.
    Zero,
}

/// Vegetation indices the toolkit can request from the Process API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VegetationIndex {
    /// Normalized Difference Vegetation Index: (NIR - Red) / (NIR + Red)
    Ndvi,
    /// Leaf Chlorophyll Index
    Lci,
    /// Modified Chlorophyll Absorption in Reflectance Index
    Mcari,
    /// Optimized Soil-Adjusted Vegetation Index
    Osavi,
}

/// Error for unrecognized index names.
#[derive(Debug)]
pub struct IndexParseError(pub String);

impl fmt::Display for IndexParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown vegetation index '{}' (expected one of: ndvi, lci, mcari, osavi)",
            self.0
        )
    }
}

impl std::error::Error for IndexParseError {}

impl VegetationIndex {
    /// Name used on the command line and in output filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            VegetationIndex::Ndvi => "ndvi",
            VegetationIndex::Lci => "lci",
            VegetationIndex::Mcari => "mcari",
            VegetationIndex::Osavi => "osavi",
        }
    }

    /// Sentinel-2 bands the index formula reads.
    pub fn bands(&self) -> &'static [&'static str] {
        match self {
            VegetationIndex::Ndvi => &["B04", "B08"],
            VegetationIndex::Lci => &["B04", "B05", "B08"],
            VegetationIndex::Mcari => &["B03", "B04", "B05"],
            VegetationIndex::Osavi => &["B04", "B08"],
        }
    }

    /// Per-pixel JavaScript expression of the index value.
    fn pixel_expression(&self) -> &'static str {
        match self {
            VegetationIndex::Ndvi => "(sample.B08 - sample.B04) / (sample.B08 + sample.B04)",
            VegetationIndex::Lci => "(sample.B08 - sample.B05) / (sample.B08 + sample.B04)",
            VegetationIndex::Mcari => {
                "((sample.B05 - sample.B04) - 0.2 * (sample.B05 - sample.B03)) * (sample.B05 / sample.B04)"
            }
            VegetationIndex::Osavi => {
                "1.16 * (sample.B08 - sample.B04) / (sample.B08 + sample.B04 + 0.16)"
            }
        }
    }

    /// Build the `//VERSION=3` evalscript computing this index as a single
    /// FLOAT32 output band, with masked pixels encoded per `masked_as`.
    pub fn evalscript(&self, masked_as: MaskedAs) -> String {
        let mut input_bands = self
            .bands()
            .iter()
            .map(|b| format!("\"{b}\""))
            .collect::<Vec<_>>();
        input_bands.push("\"dataMask\"".to_string());
        let masked_value = match masked_as {
            MaskedAs::Nan => "NaN",
            MaskedAs::Zero => "0",
        };
        format!(
            r#"//VERSION=3
function setup() {{
  return {{
    input: [{{ bands: [{input_bands}] }}],
    output: {{ bands: 1, sampleType: "FLOAT32" }}
  }};
}}
function evaluatePixel(sample) {{
  if (sample.dataMask === 0) {{ return [{masked_value}]; }}
  let value = {expression};
  return [value];
}}
"#,
            input_bands = input_bands.join(", "),
            masked_value = masked_value,
            expression = self.pixel_expression(),
        )
    }
}

impl FromStr for VegetationIndex {
    type Err = IndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ndvi" => Ok(VegetationIndex::Ndvi),
            "lci" => Ok(VegetationIndex::Lci),
            "mcari" => Ok(VegetationIndex::Mcari),
            "osavi" => Ok(VegetationIndex::Osavi),
            other => Err(IndexParseError(other.to_string())),
        }
    }
}
