//! sub-export - SUB model export tool
//!
//! Converts 3D model files (glTF/GLB, OBJ, plain JSON) to the SUB binary
//! mesh format, or to the plain JSON format for inspection.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use sub_export::model::{
    Origin, TRANSFORM_REVERSE_X, TRANSFORM_REVERSE_Y, TRANSFORM_REVERSE_Z, TRANSFORM_SWAP_XY,
    TRANSFORM_SWAP_YZ,
};
use sub_export::{export, import};

#[derive(Parser)]
#[command(name = "sub-export")]
#[command(about = "SUB model export tool")]
#[command(version)]
struct Cli {
    /// Input model file (glTF/GLB/OBJ/JSON)
    input: PathBuf,

    /// Output file; the extension picks the format (.sub or .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Uniform scale factor (> 0)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Mirror the model along the X axis
    #[arg(long)]
    reverse_x: bool,

    /// Mirror the model along the Y axis
    #[arg(long)]
    reverse_y: bool,

    /// Mirror the model along the Z axis
    #[arg(long)]
    reverse_z: bool,

    /// Swap the X and Y axes
    #[arg(long)]
    swap_xy: bool,

    /// Swap the Y and Z axes
    #[arg(long)]
    swap_yz: bool,

    /// Move the origin to the center bottom of the bounding box,
    /// e.g. [0, -1, 0] for the unit cube
    #[arg(long)]
    center_bottom: bool,
}

impl Cli {
    fn transform_flags(&self) -> u8 {
        let mut flags = 0;
        if self.reverse_x {
            flags |= TRANSFORM_REVERSE_X;
        }
        if self.reverse_y {
            flags |= TRANSFORM_REVERSE_Y;
        }
        if self.reverse_z {
            flags |= TRANSFORM_REVERSE_Z;
        }
        if self.swap_xy {
            flags |= TRANSFORM_SWAP_XY;
        }
        if self.swap_yz {
            flags |= TRANSFORM_SWAP_YZ;
        }
        flags
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut model = import::read_model(&cli.input)?;

    tracing::info!("#triangles: {}", model.num_triangles());
    tracing::info!("#vertices:  {}", model.num_vertices());
    tracing::info!("#parts:     {}", model.num_parts());
    tracing::info!("#materials: {}", model.num_materials());

    if let Some(scale) = cli.scale {
        if scale <= 0.0 {
            bail!("Scale must be > 0, got {}", scale);
        }
        model.scale(scale);
    }

    model.transform(cli.transform_flags());

    if cli.center_bottom {
        model.set_origin(Origin::CenterBottom);
    }

    model.fix_tangent_space();

    let aabb = model.aabb();
    tracing::info!("AABB: {:?} .. {:?}", aabb.min, aabb.max);

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("sub"));

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    tracing::info!("Converting {:?} -> {:?}", cli.input, output);

    match ext.as_str() {
        "sub" => export::write_sub(&output, &model)?,
        "json" => export::write_json(&output, &model)?,
        _ => bail!("Unsupported output format: {:?} (use .sub or .json)", output),
    }

    if !model.materials.is_empty() {
        let geometry_file = output
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let materials_output = output.with_extension("materials.json");
        export::write_materials(&materials_output, &geometry_file, &model)?;
        tracing::info!("Wrote materials to {:?}", materials_output);
    }

    tracing::info!("Done!");

    Ok(())
}
