use encoder_firmware::{dispatch, InterruptSource};
use rtic::mutex_prelude::*;

use crate::app::{exti2, exti3, exti9_5};

// Each handler acknowledges its EXTI line before sampling, so an edge that arrives while
// decoding re-triggers the handler rather than vanishing.

pub(crate) fn exti2(mut context: exti2::Context) {
    let source = InterruptSource::Channel1A;
    context.shared.encoder1.lock(|encoder| {
        encoder.sampler_mut().clear_pending(source);
        dispatch(source, encoder);
    });
}

pub(crate) fn exti3(mut context: exti3::Context) {
    let source = InterruptSource::Channel1B;
    context.shared.encoder1.lock(|encoder| {
        encoder.sampler_mut().clear_pending(source);
        dispatch(source, encoder);
    });
}

pub(crate) fn exti9_5(mut context: exti9_5::Context) {
    let source = InterruptSource::Channel2;
    context.shared.encoder2.lock(|encoder| {
        encoder.sampler_mut().clear_pending(source);
        dispatch(source, encoder);
    });
}
