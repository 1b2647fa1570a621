//! A streaming, incremental demuxer. Bytes are fed in via [`Demuxer::push`] as they arrive;
//! [`Demuxer::next`] yields one top-level element at a time, buffering only what is needed to
//! complete the next element (except `Cluster`, which — like every element this crate reads —
//! must have a known size and is buffered whole).

use crate::base::Header;
use crate::element::Element;
use crate::error::Error;
use crate::functional::Decode;
use crate::master::{Cues, Ebml, SeekHead, Segment, Tags, Tracks};
use crate::master::Cluster;
use crate::schema;

/// One parsed top-level element: either the EBML header or one of the six Segment children
/// this crate understands.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelElement {
    /// The EBML header.
    Ebml(Ebml),
    /// A SeekHead element.
    SeekHead(SeekHead),
    /// An Info element.
    Info(crate::master::Info),
    /// A Tracks element.
    Tracks(Tracks),
    /// A Cues element.
    Cues(Cues),
    /// A Tags element.
    Tags(Tags),
    /// A Cluster element.
    Cluster(Cluster),
}

/// The result of a single internal parsing step.
#[derive(Debug)]
pub enum Step {
    /// Bytes were consumed but no element was produced yet (e.g. the Segment header was
    /// skipped, or an unknown child element was discarded). Call `step` again immediately.
    Progress,
    /// A complete top-level element was parsed.
    Emit(TopLevelElement),
    /// Not enough buffered bytes to make progress. Call `push` before stepping again.
    Need,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingEbml,
    AwaitingSegment,
    InSegment,
    Done,
}

/// An incremental EBML/WebM demuxer.
///
/// Feed it bytes with [`push`](Demuxer::push) as they arrive over the wire, then drain parsed
/// elements with [`next`](Demuxer::next). `next` never blocks: it returns `Ok(None)` as soon as
/// the buffered bytes are insufficient to complete another element.
#[derive(Debug)]
pub struct Demuxer {
    state: State,
    buf: Vec<u8>,
    segment_remaining: u64,
}

impl Default for Demuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl Demuxer {
    /// Create a new demuxer expecting an EBML header as the first bytes pushed.
    pub fn new() -> Self {
        Self {
            state: State::AwaitingEbml,
            buf: Vec::new(),
            segment_remaining: 0,
        }
    }

    /// Append newly received bytes to the internal accumulator.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Advance the parser by one step.
    pub fn step(&mut self) -> crate::Result<Step> {
        match self.state {
            State::AwaitingEbml => self.step_ebml(),
            State::AwaitingSegment => self.step_segment_header(),
            State::InSegment => self.step_segment_child(),
            State::Done => Ok(Step::Need),
        }
    }

    /// Run `step` until an element is emitted or more bytes are needed.
    pub fn next(&mut self) -> crate::Result<Option<TopLevelElement>> {
        loop {
            match self.step()? {
                Step::Progress => continue,
                Step::Emit(e) => return Ok(Some(e)),
                Step::Need => return Ok(None),
            }
        }
    }

    fn peek_header(&self) -> crate::Result<Option<(Header, usize)>> {
        Header::try_decode(&self.buf)
    }

    /// Consume `total` bytes from the front of the accumulator, compacting it in place.
    fn consume_front(&mut self, total: usize) -> Vec<u8> {
        let taken = self.buf[..total].to_vec();
        self.buf.copy_within(total.., 0);
        self.buf.truncate(self.buf.len() - total);
        taken
    }

    fn step_ebml(&mut self) -> crate::Result<Step> {
        let Some((header, header_len)) = self.peek_header()? else {
            return Ok(Step::Need);
        };
        if header.id != Ebml::ID {
            return Err(Error::MissingElement(Ebml::ID));
        }
        if header.size.is_unknown {
            return Err(Error::ElementBodySizeUnknown(header.id));
        }
        let total = header_len + *header.size as usize;
        if self.buf.len() < total {
            return Ok(Step::Need);
        }
        let raw = self.consume_front(total);
        let ebml = Ebml::decode(&mut &raw[..])?;
        self.state = State::AwaitingSegment;
        Ok(Step::Emit(TopLevelElement::Ebml(ebml)))
    }

    fn step_segment_header(&mut self) -> crate::Result<Step> {
        let Some((header, header_len)) = self.peek_header()? else {
            return Ok(Step::Need);
        };
        if header.id != Segment::ID {
            return Err(Error::MissingElement(Segment::ID));
        }
        if header.size.is_unknown {
            return Err(Error::ElementBodySizeUnknown(header.id));
        }
        self.consume_front(header_len);
        self.segment_remaining = *header.size;
        self.state = State::InSegment;
        Ok(Step::Progress)
    }

    fn step_segment_child(&mut self) -> crate::Result<Step> {
        if self.segment_remaining == 0 {
            self.state = State::Done;
            return Ok(Step::Need);
        }
        let Some((header, header_len)) = self.peek_header()? else {
            return Ok(Step::Need);
        };
        if header.size.is_unknown {
            return Err(Error::ElementBodySizeUnknown(header.id));
        }
        let total = header_len + *header.size as usize;
        if self.buf.len() < total {
            return Ok(Step::Need);
        }
        if (total as u64) > self.segment_remaining {
            return Err(Error::OverDecode(Segment::ID));
        }

        let id = *header.id;
        let raw = self.consume_front(total);
        self.segment_remaining -= total as u64;
        if self.segment_remaining == 0 {
            self.state = State::Done;
        }

        if !schema::is_top_level_of_segment(id) {
            log::warn!(
                "Unknown or unsupported Segment child {}({}b), skipping",
                header.id,
                *header.size
            );
            return Ok(Step::Progress);
        }

        let element = match id {
            id if id == *SeekHead::ID => {
                TopLevelElement::SeekHead(SeekHead::decode(&mut &raw[..])?)
            }
            id if id == *crate::master::Info::ID => {
                TopLevelElement::Info(crate::master::Info::decode(&mut &raw[..])?)
            }
            id if id == *Tracks::ID => TopLevelElement::Tracks(Tracks::decode(&mut &raw[..])?),
            id if id == *Cues::ID => TopLevelElement::Cues(Cues::decode(&mut &raw[..])?),
            id if id == *Tags::ID => TopLevelElement::Tags(Tags::decode(&mut &raw[..])?),
            id if id == *Cluster::ID => TopLevelElement::Cluster(Cluster::decode(&mut &raw[..])?),
            _ => unreachable!("checked by is_top_level_of_segment"),
        };
        Ok(Step::Emit(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::VInt64;
    use crate::functional::Encode;
    use crate::master::Info;
    use crate::leaf_elements::{MuxingApp, TimestampScale, WritingApp};

    fn sample_ebml() -> Ebml {
        Ebml {
            doc_type: Some(crate::leaf_elements::DocType("webm".to_string())),
            ebml_max_id_length: crate::leaf_elements::EbmlMaxIdLength(4),
            ebml_max_size_length: crate::leaf_elements::EbmlMaxSizeLength(8),
            ..Default::default()
        }
    }

    fn sample_segment_bytes() -> Vec<u8> {
        let info = Info {
            timestamp_scale: TimestampScale(1_000_000),
            muxing_app: MuxingApp("test".to_string()),
            writing_app: WritingApp("test".to_string()),
            ..Default::default()
        };
        let mut info_bytes = vec![];
        info.encode(&mut info_bytes).unwrap();

        let mut segment_body = vec![];
        segment_body.extend_from_slice(&info_bytes);

        let mut out = vec![];
        Header {
            id: Segment::ID,
            size: VInt64::new(segment_body.len() as u64),
        }
        .encode(&mut out)
        .unwrap();
        out.extend_from_slice(&segment_body);
        out
    }

    #[test]
    fn test_full_stream_one_shot() {
        let mut demuxer = Demuxer::new();
        let mut ebml_bytes = vec![];
        sample_ebml().encode(&mut ebml_bytes).unwrap();
        demuxer.push(&ebml_bytes);
        demuxer.push(&sample_segment_bytes());

        let first = demuxer.next().unwrap().unwrap();
        assert!(matches!(first, TopLevelElement::Ebml(_)));

        let second = demuxer.next().unwrap().unwrap();
        assert!(matches!(second, TopLevelElement::Info(_)));

        assert!(demuxer.next().unwrap().is_none());
    }

    #[test]
    fn test_incremental_one_byte_at_a_time() {
        let mut demuxer = Demuxer::new();
        let mut all_bytes = vec![];
        sample_ebml().encode(&mut all_bytes).unwrap();
        all_bytes.extend_from_slice(&sample_segment_bytes());

        let mut elements = vec![];
        for byte in all_bytes {
            demuxer.push(&[byte]);
            while let Some(e) = demuxer.next().unwrap() {
                elements.push(e);
            }
        }
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0], TopLevelElement::Ebml(_)));
        assert!(matches!(elements[1], TopLevelElement::Info(_)));
    }
}
