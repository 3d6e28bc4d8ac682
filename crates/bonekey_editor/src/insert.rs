// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe every visible bone at the timeline cursor.
//!
//! For each visible animator of the active animation, in animator order,
//! a keyframe is ensured on position, rotation and scale (whichever the
//! animator supports) at the cursor time. The whole batch is one undo step.

use crate::config::InserterConfig;
use crate::history::{HistoryError, OperationID};
use crate::host::{
    KeyframeFactory, NotificationService, PreviewRenderer, ScrollGuard, ScrollState,
    TransactionManager,
};
use bonekey_timeline::{Animation, Channel, KeyframeRef, Selection};
use thiserror::Error;

/// Notice shown when no animation is active
pub const NO_ANIMATION_MESSAGE: &str = "No animation selected!";

/// Notice shown when the active animation has no animators
pub const NO_ANIMATORS_MESSAGE: &str = "No animators found in the timeline.";

/// Errors from a keyframe-all-bones run
#[derive(Debug, Error)]
pub enum InsertError {
    /// No animation is active
    #[error("No active animation")]
    NoActiveAnimation,

    /// The active animation has no animators
    #[error("Active animation has no animators")]
    NoAnimators,

    /// The undo history failed
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Document state a run operates on
pub struct AnimationContext<'a> {
    /// Active animation, if any
    pub animation: Option<&'a mut Animation>,
    /// Timeline cursor time in seconds
    pub time: f32,
    /// Timeline keyframe selection
    pub selection: &'a mut Selection,
}

/// Host collaborators a run talks to
pub struct HostServices<'a> {
    /// Creates or reuses keyframes
    pub keyframes: &'a mut dyn KeyframeFactory,
    /// Undo history
    pub history: &'a mut dyn TransactionManager,
    /// Pose preview
    pub preview: &'a mut dyn PreviewRenderer,
    /// Quick messages
    pub notifications: &'a dyn NotificationService,
    /// Timeline viewport scroll
    pub scroll: &'a mut dyn ScrollState,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct InsertReport {
    /// Keyframes newly created
    pub created_count: usize,
    /// Keyframes that already sat at the cursor time
    pub reused_count: usize,
    /// Every keyframe created or reused, in visit order
    pub touched: Vec<KeyframeRef>,
    /// Undo entry holding the batch
    pub transaction: OperationID,
}

/// Batch keyframe inserter
#[derive(Debug, Clone, Default)]
pub struct KeyframeInserter {
    config: InserterConfig,
}

impl KeyframeInserter {
    /// Create an inserter with the given settings
    pub fn new(config: InserterConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &InserterConfig {
        &self.config
    }

    /// Run the batch.
    ///
    /// Precondition failures show a notice and return before anything is
    /// touched. If the commit is refused, the animation and selection are
    /// rolled back to their state before the batch. Once the scroll offset
    /// has been captured it is restored on every exit path.
    pub fn run(&self, ctx: AnimationContext<'_>, host: HostServices<'_>) -> Result<InsertReport, InsertError> {
        let AnimationContext {
            animation,
            time,
            selection,
        } = ctx;
        let HostServices {
            keyframes,
            history,
            preview,
            notifications,
            scroll,
        } = host;
        let duration = self.config.message_duration();

        let Some(animation) = animation else {
            tracing::warn!("keyframe all bones: no active animation");
            notifications.show(NO_ANIMATION_MESSAGE, duration);
            return Err(InsertError::NoActiveAnimation);
        };
        if animation.animator_count() == 0 {
            tracing::warn!(animation = %animation.name, "keyframe all bones: no animators");
            notifications.show(NO_ANIMATORS_MESSAGE, duration);
            return Err(InsertError::NoAnimators);
        }

        let scroll = ScrollGuard::capture(scroll);
        let transaction = history.begin(&self.config.undo_label, animation)?;
        let rollback = transaction.before().clone();
        let selection_before = selection.clone();

        let mut created_count = 0;
        let mut reused_count = 0;
        let mut touched = Vec::new();

        for animator in animation.animators_mut() {
            if animator.hidden {
                tracing::trace!(bone = %animator.name, "skipping hidden bone");
                continue;
            }

            for channel in Channel::ALL {
                if !animator.supports(channel) {
                    continue;
                }

                let Some(insertion) =
                    keyframes.request_keyframe(animator, channel, time, self.config.force_duplicate)
                else {
                    tracing::debug!(bone = %animator.name, %channel, time, "keyframe not created");
                    continue;
                };

                if insertion.is_created() {
                    created_count += 1;
                } else {
                    reused_count += 1;
                }

                let keyframe = KeyframeRef::new(animator.id, channel, insertion.id());
                if self.config.select_keyframes {
                    if let Some(kf) = animator.keyframe_mut(channel, keyframe.keyframe) {
                        kf.selected = true;
                    }
                    selection.add(keyframe);
                }
                touched.push(keyframe);
            }
        }

        let transaction = match history.commit(transaction, animation) {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(
                    animation = %animation.name,
                    "keyframe all bones: commit failed, rolling back: {err}"
                );
                *selection = selection_before;
                *animation = rollback.to_value()?;
                return Err(err.into());
            }
        };
        preview.refresh(animation, time);
        scroll.restore();

        tracing::info!(
            animation = %animation.name,
            time,
            created = created_count,
            reused = reused_count,
            "keyframed all visible bones"
        );
        notifications.show(&format!("{created_count} keyframes added successfully."), duration);

        Ok(InsertReport {
            created_count,
            reused_count,
            touched,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{History, Result as HistoryResult, Transaction};
    use crate::host::{CurveKeyframeFactory, ScrollOffset};
    use crate::notify::QuickMessages;
    use bonekey_timeline::{Animator, ChannelSet, Insertion, Keyframe, KeyframeValue};
    use std::cell::Cell;
    use std::rc::Rc;

    /// History that counts calls and can be told to fail on commit
    #[derive(Default)]
    struct RecordingHistory {
        inner: History,
        begins: usize,
        commits: usize,
        fail_commit: bool,
    }

    impl TransactionManager for RecordingHistory {
        fn begin(&mut self, label: &str, animation: &Animation) -> HistoryResult<Transaction> {
            self.begins += 1;
            self.inner.begin(label, animation)
        }

        fn commit(&mut self, transaction: Transaction, animation: &Animation) -> HistoryResult<OperationID> {
            self.commits += 1;
            if self.fail_commit {
                return Err(HistoryError::ForeignTransaction(transaction.id()));
            }
            self.inner.commit(transaction, animation)
        }
    }

    /// Factory that refuses one channel
    struct RefusingFactory(Channel);

    impl KeyframeFactory for RefusingFactory {
        fn request_keyframe(
            &mut self,
            animator: &mut Animator,
            channel: Channel,
            time: f32,
            force_duplicate: bool,
        ) -> Option<Insertion> {
            if channel == self.0 {
                return None;
            }
            animator.create_keyframe(channel, time, force_duplicate)
        }
    }

    /// Scroll shared with the preview so a refresh can move it
    struct SharedScroll(Rc<Cell<f32>>);

    impl ScrollState for SharedScroll {
        fn get(&self) -> ScrollOffset {
            ScrollOffset(self.0.get())
        }

        fn set(&mut self, offset: ScrollOffset) {
            self.0.set(offset.0);
        }
    }

    /// Preview whose refresh jumps the timeline scroll
    struct JumpyPreview {
        scroll: Rc<Cell<f32>>,
        refreshes: usize,
    }

    impl PreviewRenderer for JumpyPreview {
        fn refresh(&mut self, _animation: &Animation, _time: f32) {
            self.refreshes += 1;
            self.scroll.set(self.scroll.get() + 500.0);
        }
    }

    struct Harness {
        inserter: KeyframeInserter,
        history: RecordingHistory,
        preview: JumpyPreview,
        messages: QuickMessages,
        scroll_pos: Rc<Cell<f32>>,
        scroll: SharedScroll,
        selection: Selection,
    }

    impl Harness {
        fn new() -> Self {
            let scroll_pos = Rc::new(Cell::new(75.0));
            Self {
                inserter: KeyframeInserter::default(),
                history: RecordingHistory::default(),
                preview: JumpyPreview {
                    scroll: scroll_pos.clone(),
                    refreshes: 0,
                },
                messages: QuickMessages::new(),
                scroll: SharedScroll(scroll_pos.clone()),
                scroll_pos,
                selection: Selection::new(),
            }
        }

        fn run_with(
            &mut self,
            factory: &mut dyn KeyframeFactory,
            animation: Option<&mut Animation>,
            time: f32,
        ) -> Result<InsertReport, InsertError> {
            self.inserter.run(
                AnimationContext {
                    animation,
                    time,
                    selection: &mut self.selection,
                },
                HostServices {
                    keyframes: factory,
                    history: &mut self.history,
                    preview: &mut self.preview,
                    notifications: &self.messages,
                    scroll: &mut self.scroll,
                },
            )
        }

        fn run(&mut self, animation: Option<&mut Animation>, time: f32) -> Result<InsertReport, InsertError> {
            self.run_with(&mut CurveKeyframeFactory, animation, time)
        }

        fn last_message(&self) -> Option<String> {
            self.messages.last().map(|m| m.text)
        }
    }

    /// A (position, rotation), B hidden (all), C (all)
    fn three_bone_rig() -> (Animation, [bonekey_timeline::AnimatorId; 3]) {
        let mut animation = Animation::new("attack");
        let a = animation.add_animator(Animator::new("A", ChannelSet::new(true, true, false)));
        let b = animation.add_animator(Animator::new("B", ChannelSet::TRANSFORM).with_hidden(true));
        let c = animation.add_animator(Animator::new("C", ChannelSet::TRANSFORM));
        (animation, [a, b, c])
    }

    #[test]
    fn test_keyframes_every_visible_bone() {
        let (mut animation, [a, b, c]) = three_bone_rig();
        let mut harness = Harness::new();

        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        assert_eq!(report.created_count, 5);
        assert_eq!(report.reused_count, 0);
        assert_eq!(harness.last_message().as_deref(), Some("5 keyframes added successfully."));
        assert_eq!(animation.animator(a).unwrap().keyframe_count(), 2);
        assert_eq!(animation.animator(b).unwrap().keyframe_count(), 0);
        assert_eq!(animation.animator(c).unwrap().keyframe_count(), 3);
        assert_eq!(harness.history.begins, 1);
        assert_eq!(harness.history.commits, 1);
        assert_eq!(harness.preview.refreshes, 1);
    }

    #[test]
    fn test_visit_order_follows_animators_then_channels() {
        let (mut animation, [a, _, c]) = three_bone_rig();
        let mut harness = Harness::new();

        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        let order: Vec<_> = report.touched.iter().map(|k| (k.animator, k.channel)).collect();
        assert_eq!(
            order,
            vec![
                (a, Channel::Position),
                (a, Channel::Rotation),
                (c, Channel::Position),
                (c, Channel::Rotation),
                (c, Channel::Scale),
            ]
        );
    }

    #[test]
    fn test_touched_keyframes_are_selected() {
        let (mut animation, _) = three_bone_rig();
        let mut harness = Harness::new();
        let earlier = KeyframeRef::new(
            bonekey_timeline::AnimatorId::new(),
            Channel::Position,
            bonekey_timeline::KeyframeId::new(),
        );
        harness.selection.add(earlier);

        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        assert!(harness.selection.contains(&earlier));
        assert_eq!(harness.selection.len(), 6);
        for keyframe in &report.touched {
            assert!(harness.selection.contains(keyframe));
            let kf = animation
                .animator(keyframe.animator)
                .and_then(|a| a.keyframe(keyframe.channel, keyframe.keyframe))
                .unwrap();
            assert!(kf.selected);
            assert!(kf.is_at(5.0));
        }
    }

    #[test]
    fn test_existing_keyframes_are_reused() {
        let (mut animation, [_, _, c]) = three_bone_rig();
        let existing = Keyframe::new(Channel::Scale, 5.0, KeyframeValue::Vec3([3.0, 3.0, 3.0]));
        let existing_id = existing.id;
        animation.animator_mut(c).unwrap().add_keyframe(existing);
        let mut harness = Harness::new();

        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        assert_eq!(report.created_count, 4);
        assert_eq!(report.reused_count, 1);
        let bone = animation.animator(c).unwrap();
        assert_eq!(bone.curve(Channel::Scale).len(), 1);
        let kf = bone.keyframe(Channel::Scale, existing_id).unwrap();
        assert_eq!(kf.value.as_vec3(), Some([3.0, 3.0, 3.0]));
        assert!(kf.selected);
        assert_eq!(harness.last_message().as_deref(), Some("4 keyframes added successfully."));
    }

    #[test]
    fn test_second_run_at_same_time_adds_nothing() {
        let (mut animation, _) = three_bone_rig();
        let mut harness = Harness::new();

        harness.run(Some(&mut animation), 5.0).unwrap();
        let total = animation.keyframe_count();
        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        assert_eq!(report.created_count, 0);
        assert_eq!(report.reused_count, 5);
        assert_eq!(animation.keyframe_count(), total);
        assert_eq!(harness.history.commits, 2);
        assert_eq!(harness.last_message().as_deref(), Some("0 keyframes added successfully."));
    }

    #[test]
    fn test_new_keyframe_copies_current_pose() {
        let mut animation = Animation::new("bob");
        let mut bone = Animator::new("head", ChannelSet::TRANSFORM);
        bone.add_keyframe(Keyframe::new(Channel::Position, 0.0, KeyframeValue::Vec3([0.0, 0.0, 0.0])));
        bone.add_keyframe(Keyframe::new(Channel::Position, 4.0, KeyframeValue::Vec3([0.0, 8.0, 0.0])));
        let head = animation.add_animator(bone);
        let mut harness = Harness::new();

        harness.run(Some(&mut animation), 1.0).unwrap();

        let bone = animation.animator(head).unwrap();
        let kf = bone.keyframe_at(Channel::Position, 1.0).unwrap();
        assert_eq!(kf.value.as_vec3(), Some([0.0, 2.0, 0.0]));
        assert_eq!(
            bone.keyframe_at(Channel::Scale, 1.0).unwrap().value.as_vec3(),
            Some([1.0, 1.0, 1.0])
        );
    }

    #[test]
    fn test_no_active_animation_touches_nothing() {
        let mut harness = Harness::new();

        let err = harness.run(None, 5.0).unwrap_err();

        assert!(matches!(err, InsertError::NoActiveAnimation));
        assert_eq!(harness.history.begins, 0);
        assert_eq!(harness.history.commits, 0);
        assert_eq!(harness.preview.refreshes, 0);
        assert!(harness.selection.is_empty());
        assert_eq!(harness.last_message().as_deref(), Some(NO_ANIMATION_MESSAGE));
    }

    #[test]
    fn test_empty_animation_touches_nothing() {
        let mut animation = Animation::new("empty");
        let mut harness = Harness::new();

        let err = harness.run(Some(&mut animation), 5.0).unwrap_err();

        assert!(matches!(err, InsertError::NoAnimators));
        assert_eq!(harness.history.begins, 0);
        assert_eq!(harness.history.inner.undo_depth(), 0);
        assert_eq!(harness.last_message().as_deref(), Some(NO_ANIMATORS_MESSAGE));
        assert_ne!(NO_ANIMATION_MESSAGE, NO_ANIMATORS_MESSAGE);
    }

    #[test]
    fn test_all_bones_hidden_still_commits_once() {
        let mut animation = Animation::new("hidden");
        animation.add_animator(Animator::new("ghost", ChannelSet::TRANSFORM).with_hidden(true));
        let mut harness = Harness::new();

        let report = harness.run(Some(&mut animation), 2.0).unwrap();

        assert_eq!(report.created_count, 0);
        assert!(report.touched.is_empty());
        assert_eq!(animation.keyframe_count(), 0);
        assert_eq!(harness.history.commits, 1);
        assert_eq!(harness.history.inner.undo_depth(), 1);
    }

    #[test]
    fn test_refused_channel_is_skipped() {
        let (mut animation, [a, _, c]) = three_bone_rig();
        let mut harness = Harness::new();
        let mut factory = RefusingFactory(Channel::Rotation);

        let report = harness.run_with(&mut factory, Some(&mut animation), 5.0).unwrap();

        assert_eq!(report.created_count, 3);
        assert!(animation.animator(a).unwrap().curve(Channel::Rotation).is_empty());
        assert!(animation.animator(c).unwrap().curve(Channel::Rotation).is_empty());
        assert_eq!(harness.history.commits, 1);
        assert_eq!(harness.last_message().as_deref(), Some("3 keyframes added successfully."));
    }

    #[test]
    fn test_scroll_offset_is_restored() {
        let (mut animation, _) = three_bone_rig();
        let mut harness = Harness::new();

        harness.run(Some(&mut animation), 5.0).unwrap();

        assert_eq!(harness.preview.refreshes, 1);
        assert_eq!(harness.scroll_pos.get(), 75.0);
    }

    #[test]
    fn test_scroll_restored_when_commit_fails() {
        let (mut animation, _) = three_bone_rig();
        let mut harness = Harness::new();
        harness.history.fail_commit = true;
        harness.scroll_pos.set(10.0);

        let err = harness.run(Some(&mut animation), 5.0).unwrap_err();

        assert!(matches!(err, InsertError::History(HistoryError::ForeignTransaction(_))));
        assert_eq!(harness.scroll_pos.get(), 10.0);
        assert_eq!(harness.preview.refreshes, 0);
    }

    #[test]
    fn test_failed_commit_rolls_back_batch() {
        let (mut animation, [_, _, c]) = three_bone_rig();
        let existing = Keyframe::new(Channel::Scale, 5.0, KeyframeValue::Vec3([3.0, 3.0, 3.0]));
        let existing_id = existing.id;
        animation.animator_mut(c).unwrap().add_keyframe(existing);
        let mut harness = Harness::new();
        let earlier = KeyframeRef::new(c, Channel::Position, bonekey_timeline::KeyframeId::new());
        harness.selection.add(earlier);
        harness.history.fail_commit = true;

        let err = harness.run(Some(&mut animation), 5.0).unwrap_err();

        assert!(matches!(err, InsertError::History(_)));
        assert_eq!(animation.keyframe_count(), 1);
        let kf = animation.animator(c).unwrap().keyframe(Channel::Scale, existing_id).unwrap();
        assert!(!kf.selected);
        assert_eq!(harness.selection.iter().copied().collect::<Vec<_>>(), vec![earlier]);
        assert_eq!(harness.history.inner.undo_depth(), 0);
        assert!(harness.last_message().is_none());
    }

    #[test]
    fn test_selection_can_be_disabled() {
        let (mut animation, _) = three_bone_rig();
        let mut harness = Harness::new();
        harness.inserter = KeyframeInserter::new(InserterConfig {
            select_keyframes: false,
            ..Default::default()
        });

        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        assert_eq!(report.created_count, 5);
        assert!(harness.selection.is_empty());
    }

    #[test]
    fn test_undo_entry_uses_batch_label() {
        let (mut animation, _) = three_bone_rig();
        let mut harness = Harness::new();

        let report = harness.run(Some(&mut animation), 5.0).unwrap();

        assert_eq!(
            harness.history.inner.undo_description(),
            Some("Add keyframes to all visible bones")
        );
        let group = harness.history.inner.undo().unwrap();
        assert_eq!(group.id, report.transaction);
        assert_eq!(group.restore_before().unwrap().keyframe_count(), 0);
    }
}
