use elicit_core::ErrorResponse;
use elicit_core::responses::{
    ExplainResponse, InitialRequest, InitialResponse, NextRequest, NextResponse,
    PredictionResponse,
};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `elicit schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::InitialRequest => schema_for!(InitialRequest),
        SchemaType::InitialResponse => schema_for!(InitialResponse),
        SchemaType::NextRequest => schema_for!(NextRequest),
        SchemaType::NextResponse => schema_for!(NextResponse),
        SchemaType::PredictionResponse => schema_for!(PredictionResponse),
        SchemaType::ExplainResponse => schema_for!(ExplainResponse),
        SchemaType::ErrorResponse => schema_for!(ErrorResponse),
    };
    output(&schema, flags.format)
}
