use opencv::core::Rect;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::SizeSpec;

/// One kept face rectangle in pixel coordinates.
///
/// `label` is the detection's 1-based enumeration position in the *raw*
/// detector output, not in the filtered list: when an oversized
/// detection is dropped, its label slot is consumed anyway and the
/// surviving labels keep a gap. That numbering is part of the on-disk
/// JSON contract and must not be "fixed" here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub label: usize,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Per-frame record: stream-reported sequence index and timestamp plus
/// the kept detections in detector order. Frames with zero kept
/// detections still get a record.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRecord {
    pub index: i64,
    pub time: f64,
    pub faces: Vec<Detection>,
}

/// The full run log, ordered by frame arrival.
///
/// Kept as a plain sequence internally; the `frame<N>`-keyed object
/// shape only exists at the serialization boundary, so output key
/// order is exactly push order with no reliance on map iteration
/// guarantees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultLog {
    records: Vec<FrameRecord>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }
}

/// Inclusive upper bound on detection size: a rectangle exactly at the
/// configured maximum is kept.
pub fn within_max(rect: &Rect, max: &SizeSpec) -> bool {
    rect.width <= max.w && rect.height <= max.h
}

/// Applies the max-size filter to raw detector output, assigning labels
/// by raw enumeration position (see [`Detection`]).
pub fn collect_faces(raw: &[Rect], max: &SizeSpec) -> Vec<Detection> {
    raw.iter()
        .enumerate()
        .filter(|(_, rect)| within_max(rect, max))
        .map(|(i, rect)| Detection {
            label: i + 1,
            x: rect.x,
            y: rect.y,
            w: rect.width,
            h: rect.height,
        })
        .collect()
}

#[derive(Serialize)]
struct RectFields {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Serialize for Detection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &format!("face{}", self.label),
            &RectFields {
                x: self.x,
                y: self.y,
                w: self.w,
                h: self.h,
            },
        )?;
        map.end()
    }
}

impl Serialize for FrameRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("faces", &self.faces)?;
        map.serialize_entry("time", &self.time)?;
        map.end()
    }
}

impl Serialize for ResultLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&format!("frame{}", record.index), record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rect(w: i32, h: i32) -> Rect {
        Rect::new(10, 20, w, h)
    }

    const MAX: SizeSpec = SizeSpec { w: 100, h: 100 };

    #[rstest]
    #[case::well_inside(50, 50, true)]
    #[case::exactly_at_bound(100, 100, true)]
    #[case::width_over(101, 50, false)]
    #[case::height_over(50, 101, false)]
    #[case::both_over(101, 101, false)]
    fn test_within_max_inclusive_bound(#[case] w: i32, #[case] h: i32, #[case] kept: bool) {
        assert_eq!(within_max(&rect(w, h), &MAX), kept);
    }

    #[test]
    fn test_collect_faces_empty_input() {
        assert!(collect_faces(&[], &MAX).is_empty());
    }

    #[test]
    fn test_collect_faces_preserves_detector_order() {
        let raw = vec![Rect::new(0, 0, 40, 40), Rect::new(50, 50, 60, 60)];
        let faces = collect_faces(&raw, &MAX);
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].label, 1);
        assert_eq!(faces[0].x, 0);
        assert_eq!(faces[1].label, 2);
        assert_eq!(faces[1].x, 50);
    }

    #[test]
    fn test_collect_faces_labels_keep_gaps_from_filtered_detections() {
        // Raw order [big, small, small]: the big one is dropped but its
        // label slot is consumed, so the survivors are face2 and face3.
        let raw = vec![
            Rect::new(0, 0, 200, 200),
            Rect::new(10, 10, 40, 40),
            Rect::new(60, 60, 40, 40),
        ];
        let faces = collect_faces(&raw, &MAX);
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].label, 2);
        assert_eq!(faces[1].label, 3);
    }

    #[test]
    fn test_serialize_empty_log() {
        let log = ResultLog::new();
        assert_eq!(serde_json::to_string(&log).unwrap(), "{}");
    }

    #[test]
    fn test_serialize_frame_with_no_faces() {
        let mut log = ResultLog::new();
        log.push(FrameRecord {
            index: 0,
            time: 0.5,
            faces: vec![],
        });
        assert_eq!(
            serde_json::to_string(&log).unwrap(),
            r#"{"frame0":{"faces":[],"time":0.5}}"#
        );
    }

    #[test]
    fn test_serialize_detection_shape_and_gap_label() {
        let mut log = ResultLog::new();
        log.push(FrameRecord {
            index: 3,
            time: 0.125,
            faces: vec![Detection {
                label: 2,
                x: 10,
                y: 20,
                w: 30,
                h: 40,
            }],
        });
        assert_eq!(
            serde_json::to_string(&log).unwrap(),
            r#"{"frame3":{"faces":[{"face2":{"x":10,"y":20,"w":30,"h":40}}],"time":0.125}}"#
        );
    }

    #[test]
    fn test_serialize_keys_follow_push_order_not_lexicographic() {
        // frame10 must come after frame9: push order wins over any
        // lexicographic or sorted-map ordering.
        let mut log = ResultLog::new();
        for index in 8..=10 {
            log.push(FrameRecord {
                index,
                time: index as f64 * 0.25,
                faces: vec![],
            });
        }
        let json = serde_json::to_string(&log).unwrap();
        let frame9 = json.find("\"frame9\"").unwrap();
        let frame10 = json.find("\"frame10\"").unwrap();
        assert!(frame9 < frame10);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut log = ResultLog::new();
        for index in 0..5 {
            log.push(FrameRecord {
                index,
                time: index as f64 / 30.0,
                faces: vec![Detection {
                    label: 1,
                    x: index as i32,
                    y: 0,
                    w: 10,
                    h: 10,
                }],
            });
        }
        let first = serde_json::to_string(&log).unwrap();
        let second = serde_json::to_string(&log).unwrap();
        assert_eq!(first, second);
    }
}
