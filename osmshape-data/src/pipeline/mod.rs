//! Drives elements from a reader through shaping and validation into a sink.

use log::warn;
use osmshape_core::{Element, ElementRef, Schema, ShapeError, Shaper, ValidationError, validate};
use thiserror::Error;

use crate::reader::ReadError;
use crate::sink::{RelationSink, SinkError};

mod report;

pub use report::{ConversionReport, Quarantined};

/// What happens to a bundle that fails the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Write bundles without checking them.
    Disabled,
    /// Abort the run on the first failing element.
    #[default]
    Fatal,
    /// Leave failing elements out, record them in the report and continue.
    Quarantine,
}

/// Options for [`convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    /// Handling of schema failures and malformed elements.
    pub validation: ValidationMode,
}

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The document could not be read.
    #[error("failed to read the OSM document")]
    Read(#[from] ReadError),
    /// A node or way lacked a required attribute.
    #[error("failed to shape {}", .0.element())]
    Shape(#[from] ShapeError),
    /// A shaped bundle did not satisfy the schema.
    #[error("{element} failed validation")]
    Validation {
        /// The offending element.
        element: ElementRef,
        /// First failing field.
        #[source]
        source: Box<ValidationError>,
    },
    /// The sink rejected a bundle.
    #[error("failed to write {element}")]
    Write {
        /// Element whose records were being written.
        element: ElementRef,
        /// Underlying sink error.
        #[source]
        source: SinkError,
    },
    /// The sink could not be finished after all elements were written.
    #[error("failed to finish the outputs")]
    Finish {
        /// Underlying sink error.
        #[source]
        source: SinkError,
    },
}

/// Convert every element yielded by `elements` and write the results.
///
/// Nodes and ways are shaped, validated according to `options`, and handed
/// to `sink` in document order. Relations and other elements are counted and
/// passed over. The sink is finished exactly once whether the run succeeds
/// or not; when the run has already failed, a finishing error is logged and
/// the original error is returned.
///
/// # Examples
/// ```
/// use osmshape_core::Schema;
/// use osmshape_data::{ConvertOptions, ElementFilter, ElementReader, MemorySink, convert};
///
/// let xml = r#"<osm>
///   <node id="1" lat="51.5" lon="-0.1" user="a" uid="1" version="1"
///         changeset="1" timestamp="2020-01-01T00:00:00Z"/>
/// </osm>"#;
/// let reader = ElementReader::new(xml.as_bytes(), ElementFilter::default());
/// let mut sink = MemorySink::new();
/// let report = convert(reader, &mut sink, &Schema::default(), &ConvertOptions::default())?;
///
/// assert_eq!(report.nodes, 1);
/// assert_eq!(sink.nodes.len(), 1);
/// assert!(sink.is_finished());
/// # Ok::<(), osmshape_data::ConvertError>(())
/// ```
pub fn convert<I, S>(
    elements: I,
    sink: &mut S,
    schema: &Schema,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError>
where
    I: IntoIterator<Item = Result<Element, ReadError>>,
    S: RelationSink + ?Sized,
{
    let outcome = run(elements, sink, schema, options);
    let finished = sink.finish();
    match (outcome, finished) {
        (Ok(report), Ok(())) => {
            report.log_summary();
            Ok(report)
        }
        (Ok(_), Err(source)) => Err(ConvertError::Finish { source }),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(finish_err)) => {
            warn!("failed to finish outputs after an aborted run: {finish_err}");
            Err(err)
        }
    }
}

fn run<I, S>(
    elements: I,
    sink: &mut S,
    schema: &Schema,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError>
where
    I: IntoIterator<Item = Result<Element, ReadError>>,
    S: RelationSink + ?Sized,
{
    let mut shaper = Shaper::new();
    let mut report = ConversionReport::default();
    for item in elements {
        let element = item?;
        let dropped_before = shaper.dropped_tags();
        let bundle = match shaper.shape(&element) {
            Ok(Some(bundle)) => bundle,
            Ok(None) => {
                report.record_passed_over(&element);
                continue;
            }
            Err(err) if options.validation == ValidationMode::Quarantine => {
                warn!("quarantined {}: {err}", err.element());
                report.quarantine(err.element().clone(), err.to_string());
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if options.validation != ValidationMode::Disabled
            && let Err(failure) = validate(&bundle, schema)
        {
            let element_ref = bundle.element();
            if options.validation == ValidationMode::Fatal {
                return Err(ConvertError::Validation {
                    element: element_ref,
                    source: Box::new(failure),
                });
            }
            warn!("quarantined {element_ref}: {failure}");
            report.quarantine(element_ref, failure.to_string());
            continue;
        }
        sink.write(&bundle)
            .map_err(|source| ConvertError::Write {
                element: bundle.element(),
                source,
            })?;
        report.record_bundle(&bundle);
        report.dropped_tags += shaper.dropped_tags().saturating_sub(dropped_before);
    }
    Ok(report)
}
