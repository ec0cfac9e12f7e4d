use glam::Vec2;

use super::fixture::*;
use crate::thing::MapObjFlag;
use crate::xg::class::ClassId;
use crate::xg::traverse::{
    collect_lines, collect_planes, traverse_lines, traverse_planes, validate_line_ref, LineDataRef,
    LineRef, PlaneRef,
};
use crate::xg::LineCtx;

fn lines(found: Vec<Option<LineCtx>>) -> Vec<usize> {
    found.into_iter().map(|l| l.map(|l| l.line).unwrap_or(usize::MAX)).collect()
}

fn planes(found: Vec<(Option<usize>, bool)>) -> Vec<usize> {
    found.into_iter().filter_map(|(s, _)| s).collect()
}

fn tagged_fixture() -> Fixture {
    let mut marked = line_type(100, ClassId::None);
    marked.act_tag = 7;
    let plain = line_type(101, ClassId::None);
    Fixture::new(&[(100, 9), (101, 9), (100, 4), (0, 9)], vec![marked, plain])
}

#[test]
fn line_references() {
    let fix = tagged_fixture();
    let level = &fix.level;
    let origin = LineCtx::line(1);
    let line = |kind: LineRef, datum| lines(collect_lines(level, origin, kind as i32, datum));

    assert_eq!(line(LineRef::All, 0), vec![0, 1, 2, 3]);
    assert_eq!(line(LineRef::Tagged, 9), vec![0, 1, 3]);
    assert_eq!(line(LineRef::Tagged, 12), Vec::<usize>::new());
    assert_eq!(line(LineRef::LineTagged, 0), vec![0, 1, 3]);
    assert_eq!(line(LineRef::LineTagged, 1), vec![0, 3]);
    assert_eq!(line(LineRef::ActTagged, 7), vec![0, 2]);
    assert_eq!(line(LineRef::Index, 2), vec![2]);
    assert_eq!(line(LineRef::Index, 4), Vec::<usize>::new());
    assert_eq!(line(LineRef::Index, -1), Vec::<usize>::new());
    assert_eq!(line(LineRef::SelfRef, 0), vec![1]);

    assert_eq!(collect_lines(level, origin, LineRef::None as i32, 0), vec![None]);
    assert!(collect_lines(level, origin, 42, 0).is_empty());
}

#[test]
fn self_reference_keeps_scratch_context() {
    let fix = tagged_fixture();
    let origin = LineCtx {
        line: 2,
        scratch: Some(0),
    };
    assert_eq!(
        collect_lines(&fix.level, origin, LineRef::SelfRef as i32, 0),
        vec![Some(origin)]
    );
}

#[test]
fn line_traversal_stops_early() {
    let mut fix = tagged_fixture();
    let mut seen = Vec::new();
    let finished = traverse_lines(&mut fix.level, LineCtx::line(0), LineRef::All as i32, 0, |_, line| {
        seen.push(line.map(|l| l.line));
        seen.len() < 2
    });
    assert!(!finished);
    assert_eq!(seen, vec![Some(0), Some(1)]);

    let mut count = 0;
    let finished = traverse_lines(&mut fix.level, LineCtx::line(0), LineRef::Tagged as i32, 9, |_, _| {
        count += 1;
        true
    });
    assert!(finished);
    assert_eq!(count, 3);
}

#[test]
fn plane_references() {
    let mut fix = Fixture::new(&[(0, 5), (0, 0)], vec![]);
    fix.level.map_data.sectors_mut()[2].act_tag = 3;
    let imp = fix.spawn(IMP_KIND, Vec2::new(200.0, 200.0), MapObjFlag::CountKill as u32, 2);
    let level = &fix.level;
    let origin = LineCtx::line(0);
    let plane = |kind: PlaneRef, datum| collect_planes(level, origin, kind as i32, datum);

    assert_eq!(plane(PlaneRef::MyFloor, 0), vec![(Some(0), false)]);
    assert_eq!(plane(PlaneRef::MyCeiling, 0), vec![(Some(0), true)]);
    assert_eq!(planes(plane(PlaneRef::TaggedFloors, 5)), vec![1, 2]);
    assert_eq!(
        plane(PlaneRef::LineTaggedCeilings, 0),
        vec![(Some(1), true), (Some(2), true)]
    );
    assert_eq!(planes(plane(PlaneRef::ActTaggedFloors, 3)), vec![2]);
    assert_eq!(planes(plane(PlaneRef::IndexFloor, 1)), vec![1]);
    assert!(plane(PlaneRef::IndexCeiling, 3).is_empty());
    assert_eq!(planes(plane(PlaneRef::AllCeilings, 0)), vec![0, 1, 2]);
    assert_eq!(planes(plane(PlaneRef::Special, 9)), vec![1, 2]);
    assert!(plane(PlaneRef::BackFloor, 0).is_empty());
    assert!(plane(PlaneRef::BackCeiling, 0).is_empty());
    assert_eq!(planes(plane(PlaneRef::ThingExistFloors, IMP_KIND)), vec![2]);
    assert_eq!(planes(plane(PlaneRef::ThingExistCeilings, PLAYER_KIND)), vec![0]);
    assert_eq!(planes(plane(PlaneRef::ThingNoExistFloors, IMP_KIND)), vec![0, 1]);

    assert_eq!(plane(PlaneRef::None, 0), vec![(None, false)]);
    assert!(collect_planes(level, origin, 40, 0).is_empty());

    fix.level.remove_map_object(imp);
    assert!(collect_planes(&fix.level, origin, PlaneRef::ThingExistFloors as i32, IMP_KIND).is_empty());
}

#[test]
fn plane_traversal_stops_early() {
    let mut fix = Fixture::new(&[(0, 0)], vec![]);
    let mut seen = Vec::new();
    let finished = traverse_planes(
        &mut fix.level,
        LineCtx::line(0),
        PlaneRef::AllFloors as i32,
        0,
        |_, sector, ceiling| {
            seen.push((sector, ceiling));
            sector != Some(1)
        },
    );
    assert!(!finished);
    assert_eq!(seen, vec![(Some(0), false), (Some(1), false)]);
}

#[test]
fn line_data() {
    let mut fix = tagged_fixture();
    fix.level.map_data.sidedefs_mut()[1].middle.offset = Vec2::new(3.0, -2.0);
    fix.xg_mut(0).info.act_count = 4;
    let level = &fix.level;
    let data = |line: usize, kind: LineDataRef| validate_line_ref(level, LineCtx::line(line), kind as i32, "test");

    assert_eq!(data(1, LineDataRef::Id), 1);
    assert_eq!(data(2, LineDataRef::Special), 100);
    assert_eq!(data(2, LineDataRef::Tag), 4);
    assert_eq!(data(0, LineDataRef::ActTag), 7);
    assert_eq!(data(3, LineDataRef::ActTag), 0);
    assert_eq!(data(0, LineDataRef::Count), 4);
    assert_eq!(data(3, LineDataRef::Count), 0);
    assert_eq!(data(0, LineDataRef::Angle), 90);
    assert_eq!(data(0, LineDataRef::Length), 64);
    assert_eq!(data(1, LineDataRef::MiddleOffsetX), 3);
    assert_eq!(data(1, LineDataRef::MiddleOffsetY), -2);
    assert_eq!(data(1, LineDataRef::TopOffsetX), 0);
    assert_eq!(data(0, LineDataRef::None), 0);

    assert_eq!(validate_line_ref(level, LineCtx::line(0), 99, "test"), 0);
    assert_eq!(validate_line_ref(level, LineCtx::line(40), LineDataRef::Id as i32, "test"), 0);
}
