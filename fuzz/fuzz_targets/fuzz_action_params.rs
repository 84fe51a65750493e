#![no_main]

use action_eventlog::actions::{
    create_action_event_log_record_object, validated_related_saved_objects,
    CreateActionEventLogRecordParams,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let related = value
        .as_object_mut()
        .and_then(|object| object.remove("relatedSavedObjects"));
    let Ok(mut params) = serde_json::from_value::<CreateActionEventLogRecordParams>(value) else {
        return;
    };
    if let Some(related) = related {
        params.related_saved_objects = Some(validated_related_saved_objects(&related));
    }

    let event = create_action_event_log_record_object(&params);
    let expected = params.saved_objects.len()
        + params.related_saved_objects.as_ref().map_or(0, Vec::len);
    assert_eq!(event.kibana.saved_objects.len(), expected);
    serde_json::to_string(&event).expect("event serializes");
});
