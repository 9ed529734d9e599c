use firmament_log::{try_subscribe, Log, SubscribeError};

#[test]
fn second_subscription_is_reported_as_repeated() {
    assert_eq!(try_subscribe(Log::default()), Ok(()));
    assert_eq!(
        try_subscribe(Log::default()),
        Err(SubscribeError::AlreadySubscribed)
    );
}
