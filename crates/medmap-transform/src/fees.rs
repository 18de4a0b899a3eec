//! Merging payer fee schedules.
//!
//! Each raw schedule is trimmed to the rows its [`FeeScheduleSource`] keeps
//! and reshaped to `PROCEDURE, Amount, Key_FS`. The reshaped schedules are then
//! unioned with a `Source` column naming the payer.

use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};

use medmap_model::{
    FEE_AMOUNT_COLUMN, FEE_KEY_COLUMN, FEE_PROCEDURE_COLUMN, FEE_SOURCE_COLUMN,
    FeeScheduleSource, RowFilter,
};

use crate::data_utils::{column_optional_values, require_column};
use crate::error::TransformError;
use crate::frame::{SourceFrame, combine_source_frames, drop_empty_rows};

/// Keep the rows that meet every filter.
///
/// A filter on a column the frame does not have is an error.
pub fn apply_row_filters(
    df: &DataFrame,
    filters: &[RowFilter],
) -> Result<DataFrame, TransformError> {
    if filters.is_empty() {
        return Ok(df.clone());
    }
    let mut mask = vec![true; df.height()];
    for filter in filters {
        let values = column_optional_values(require_column(df, filter.column())?);
        for (keep, value) in mask.iter_mut().zip(&values) {
            *keep = *keep && filter.keeps(value.as_deref());
        }
    }
    let mask = BooleanChunked::from_slice("keep".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Reshape one raw schedule into `PROCEDURE, Amount, Key_FS` rows.
pub fn prepare_fee_schedule(
    df: &DataFrame,
    schedule: &FeeScheduleSource,
) -> Result<SourceFrame, TransformError> {
    let raw_rows = df.height();
    let kept = apply_row_filters(&drop_empty_rows(df)?, &schedule.filters)?;

    let procedures = column_optional_values(require_column(&kept, &schedule.procedure_column)?);
    let amounts = column_optional_values(require_column(&kept, &schedule.amount_column)?);
    let modifiers = match &schedule.modifier_column {
        Some(name) => column_optional_values(require_column(&kept, name)?),
        None => vec![None; kept.height()],
    };
    let keys: Vec<String> = procedures
        .iter()
        .zip(&modifiers)
        .map(|(procedure, modifier)| {
            schedule.key(procedure.as_deref().unwrap_or_default(), modifier.as_deref())
        })
        .collect();

    let data = DataFrame::new(vec![
        Column::new(FEE_PROCEDURE_COLUMN.into(), procedures),
        Column::new(FEE_AMOUNT_COLUMN.into(), amounts),
        Column::new(FEE_KEY_COLUMN.into(), keys),
    ])?;
    tracing::debug!(
        source = %schedule.source,
        raw_rows,
        kept_rows = data.height(),
        "prepared fee schedule"
    );

    let mut frame = SourceFrame::new(schedule.source.clone(), data);
    frame.add_source_file(schedule.path.clone());
    Ok(frame)
}

/// Union prepared schedules into `PROCEDURE, Amount, Key_FS, Source` rows.
pub fn combine_fee_schedules(frames: &[SourceFrame]) -> Result<DataFrame, TransformError> {
    combine_source_frames(frames, FEE_SOURCE_COLUMN)
}
