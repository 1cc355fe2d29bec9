use common::utils::log_entry::detection::DetectionEntry;

/// Class id reserved for the background sentinel; never surfaced to callers.
pub const BACKGROUND_CLASS_ID: usize = 0;

/// The capability's label table (torchvision COCO ordering, 91 entries).
/// Ids the capability never emits in practice map to "N/A" placeholders;
/// ids outside the table are a contract violation and fail the lookup.
pub const CLASS_LABELS: [&str; 91] = [
    "__background__", "person", "bicycle", "car", "motorcycle", "airplane", "bus",
    "train", "truck", "boat", "traffic light", "fire hydrant", "N/A", "stop sign",
    "parking meter", "bench", "bird", "cat", "dog", "horse", "sheep", "cow",
    "elephant", "bear", "zebra", "giraffe", "N/A", "backpack", "umbrella", "N/A", "N/A",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "N/A", "wine glass", "cup", "fork", "knife", "spoon", "bowl",
    "banana", "apple", "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza",
    "donut", "cake", "chair", "couch", "potted plant", "bed", "N/A", "dining table",
    "N/A", "N/A", "toilet", "N/A", "tv", "laptop", "mouse", "remote", "keyboard",
    "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "N/A",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

pub fn lookup(class_id: usize) -> Result<&'static str, String> {
    CLASS_LABELS
        .get(class_id)
        .copied()
        .ok_or_else(|| DetectionEntry::UnknownClassId(class_id).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_deterministic_and_stable() {
        assert_eq!(lookup(17).unwrap(), "cat");
        assert_eq!(lookup(17).unwrap(), "cat");
        assert_eq!(lookup(1).unwrap(), "person");
        assert_eq!(lookup(90).unwrap(), "toothbrush");
    }

    #[test]
    fn index_zero_is_the_background_sentinel() {
        assert_eq!(lookup(BACKGROUND_CLASS_ID).unwrap(), "__background__");
    }

    #[test]
    fn out_of_range_id_fails_loudly() {
        let err = lookup(91).unwrap_err();
        assert_eq!(err, "Class id 91 is outside the label table");
        assert!(lookup(usize::MAX).is_err());
    }
}
