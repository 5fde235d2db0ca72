use std::fmt::Display;
use std::io::Write;

use crate::annotation::domain::annotation_results::{AnnotateVideoResponse, VideoAnnotationResults};
use crate::shared::error::AnnotateError;
use crate::shared::time_offset::TimeOffset;

/// Renders one aspect of an annotation result as console lines.
pub trait ResultReport {
    fn print(
        &self,
        result: &VideoAnnotationResults,
        out: &mut dyn Write,
    ) -> Result<(), AnnotateError>;
}

/// Picks the results for the single submitted video.
///
/// Fails if the service returned no results or flagged the video itself
/// as failed.
pub fn single_result(
    response: &AnnotateVideoResponse,
) -> Result<&VideoAnnotationResults, AnnotateError> {
    let result = response
        .first_result()
        .ok_or(AnnotateError::EmptyResult("annotation results"))?;
    if let Some(status) = &result.error {
        return Err(AnnotateError::Remote {
            code: status.code,
            message: status.message.clone(),
        });
    }
    Ok(result)
}

fn seconds(offset: &TimeOffset) -> String {
    two_places(offset.as_secs_f64())
}

/// Formats `value` with two decimals, rounding half-up on its shortest
/// decimal representation rather than on the exact binary value, so that
/// `3.505` prints as `3.51`.
pub fn two_places(value: impl Display) -> String {
    let shortest = value.to_string();
    let (negative, magnitude) = match shortest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, shortest.as_str()),
    };
    let (whole, fraction) = magnitude.split_once('.').unwrap_or((magnitude, ""));
    if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return shortest;
    }

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(2))
        .collect();
    if fraction.as_bytes().get(2).is_some_and(|&d| d >= b'5') {
        round_up(&mut digits);
    }

    let (int_part, frac_part) = digits.split_at(digits.len() - 2);
    let sign = if negative { "-" } else { "" };
    format!(
        "{sign}{}.{}",
        String::from_utf8_lossy(int_part),
        String::from_utf8_lossy(frac_part)
    )
}

fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Deep view of the first detected text: its first segment, that segment's
/// first frame, and the frame's rotated bounding box.
pub struct DetailedTextReport;

impl ResultReport for DetailedTextReport {
    fn print(
        &self,
        result: &VideoAnnotationResults,
        out: &mut dyn Write,
    ) -> Result<(), AnnotateError> {
        let annotation = result
            .text_annotations
            .first()
            .ok_or(AnnotateError::EmptyResult("text annotations"))?;
        let text_segment = annotation
            .segments
            .first()
            .ok_or(AnnotateError::EmptyResult("text segments"))?;
        let frame = text_segment
            .frames
            .first()
            .ok_or(AnnotateError::EmptyResult("text frames"))?;
        let segment = &text_segment.segment;

        let mut write = || -> std::io::Result<()> {
            writeln!(out, "Text: {}", annotation.text)?;
            writeln!(out, "Confidence: {:?}", text_segment.confidence)?;
            writeln!(out, "Start time: {}", seconds(&segment.start_time_offset))?;
            writeln!(out, "End time: {}", seconds(&segment.end_time_offset))?;
            writeln!(
                out,
                "Time offset for the first frame: {}",
                seconds(&frame.time_offset)
            )?;
            writeln!(out, "Rotated Bounding Box Vertices:")?;
            for vertex in &frame.rotated_bounding_box.vertices {
                writeln!(
                    out,
                    "\tVertex.x: {}, Vertex.y: {}",
                    two_places(vertex.x),
                    two_places(vertex.y)
                )?;
            }
            Ok(())
        };
        write().map_err(AnnotateError::Output)
    }
}

/// Every detected text joined into a single line, without separators.
pub struct ConcatenatedTextReport;

impl ResultReport for ConcatenatedTextReport {
    fn print(
        &self,
        result: &VideoAnnotationResults,
        out: &mut dyn Write,
    ) -> Result<(), AnnotateError> {
        let joined: String = result
            .text_annotations
            .iter()
            .map(|a| a.text.as_str())
            .collect();
        writeln!(out, "Text: {joined}").map_err(AnnotateError::Output)
    }
}

/// Top alternative of each speech transcription, one per line.
pub struct TranscriptReport;

impl ResultReport for TranscriptReport {
    fn print(
        &self,
        result: &VideoAnnotationResults,
        out: &mut dyn Write,
    ) -> Result<(), AnnotateError> {
        for (i, transcription) in result.speech_transcriptions.iter().enumerate() {
            match transcription.alternatives.first() {
                Some(best) => {
                    writeln!(out, "Transcript: {}", best.transcript)
                        .map_err(AnnotateError::Output)?;
                }
                None => log::warn!("Transcription {i} has no alternatives, skipping"),
            }
        }
        Ok(())
    }
}
