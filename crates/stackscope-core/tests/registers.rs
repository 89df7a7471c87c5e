//! Tests for the register file and alias tables

use std::collections::HashSet;

use proptest::array::{uniform18, uniform31, uniform32};
use proptest::prelude::*;
use stackscope_core::error::CoreError;
use stackscope_core::raw::arm::{UserRegsArm, UserVfpArm};
use stackscope_core::raw::arm64::{UserFpsimdArm64, UserPtRegsArm64};
use stackscope_core::raw::x86::{UserFxsrX86, UserRegsX86};
use stackscope_core::raw::x86_64::{UserFpRegsX86_64, UserRegsX86_64};
use stackscope_core::registers::float::FloatClass;
use stackscope_core::registers::{RegisterBlock, RegisterFile, RegisterRole, REGISTER_SENTINEL};
use stackscope_core::types::{Address, Architecture};
use test_case::test_case;

/// Both blocks filled, every slot holding a distinct value.
fn filled(architecture: Architecture) -> RegisterFile
{
    let mut regs = RegisterFile::new(architecture);
    match architecture {
        Architecture::X86 => {
            let gpr = UserRegsX86 {
                eax: 0x11,
                ecx: 0x12,
                edx: 0x13,
                ebx: 0x14,
                esp: 0xbfff_f000,
                ebp: 0xbfff_f010,
                esi: 0x17,
                edi: 0x18,
                eip: 0x0804_8000,
                xcs: 0x23,
                xss: 0x2b,
                xds: 0x2c,
                xes: 0x2d,
                xfs: 0x2e,
                xgs: 0x63,
                eflags: 0x246,
                orig_eax: 0,
            };
            let mut fpu = UserFxsrX86::default();
            for (i, word) in fpu.xmm_space.iter_mut().enumerate() {
                *word = 0x1000 + i as u32;
            }
            fpu.mxcsr = 0x1f80;
            regs.fill(&(gpr, fpu)).unwrap();
        }
        Architecture::X86_64 => {
            let gpr = UserRegsX86_64 {
                rax: 1,
                rcx: 2,
                rdx: 3,
                rbx: 4,
                rsp: 0x7ffe_0000,
                rbp: 0x7ffe_0010,
                rsi: 7,
                rdi: 8,
                r8: 9,
                r9: 10,
                r10: 11,
                r11: 12,
                r12: 13,
                r13: 14,
                r14: 15,
                r15: 16,
                rip: 0x40_1000,
                eflags: 0x202,
                cs: 0x33,
                ss: 0x2b,
                fs_base: 0x7f00_0000,
                gs_base: 0x7f10_0000,
                ..Default::default()
            };
            let mut fpu = UserFpRegsX86_64::default();
            for (i, word) in fpu.xmm_space.iter_mut().enumerate() {
                *word = 0x2000 + i as u32;
            }
            fpu.mxcsr = 0x1f80;
            regs.fill(&(gpr, fpu)).unwrap();
        }
        Architecture::Arm => {
            let mut gpr = UserRegsArm::default();
            for (i, word) in gpr.uregs.iter_mut().enumerate() {
                *word = 0x100 + i as u32;
            }
            let mut vfp = UserVfpArm::default();
            for (i, d) in vfp.fpregs.iter_mut().enumerate() {
                *d = 0x3ff0_0000_0000_0000 + i as u64;
            }
            vfp.fpscr = 0x0300_0000;
            regs.fill(&(gpr, vfp)).unwrap();
        }
        Architecture::Arm64 => {
            let mut gpr = UserPtRegsArm64::default();
            for (i, reg) in gpr.regs.iter_mut().enumerate() {
                *reg = 0x1000 + i as u64;
            }
            gpr.sp = 0x7fff_f000;
            gpr.pc = 0x40_0000;
            gpr.pstate = 0x6000_0000;
            let mut fpsimd = UserFpsimdArm64::default();
            for (i, v) in fpsimd.vregs.iter_mut().enumerate() {
                *v = (i as u128) << 64 | 0xff;
            }
            fpsimd.fpsr = 0x10;
            regs.fill(&(gpr, fpsimd)).unwrap();
        }
    }
    regs
}

#[test_case(Architecture::X86 ; "x86")]
#[test_case(Architecture::X86_64 ; "x86_64")]
#[test_case(Architecture::Arm ; "arm")]
#[test_case(Architecture::Arm64 ; "arm64")]
fn test_every_alias_resolves_to_the_same_value(architecture: Architecture)
{
    let regs = filled(architecture);
    for def in architecture.register_table().registers() {
        let canonical = regs.lookup(def.canonical_name());
        assert!(canonical.is_some(), "{} unavailable", def.canonical_name());

        for name in def.names {
            assert_eq!(regs.lookup(name), canonical, "alias {name}");
            assert_eq!(regs.lookup(&name.to_ascii_uppercase()), canonical, "alias {name} uppercased");
        }
        assert_eq!(regs.by_role(def.role), canonical);
    }
}

#[test_case(Architecture::X86 ; "x86")]
#[test_case(Architecture::X86_64 ; "x86_64")]
#[test_case(Architecture::Arm ; "arm")]
#[test_case(Architecture::Arm64 ; "arm64")]
fn test_aliases_and_roles_are_unique(architecture: Architecture)
{
    let table = architecture.register_table();
    let mut names = HashSet::new();
    let mut roles = HashSet::new();
    let mut slots = HashSet::new();
    for def in table.registers() {
        for name in def.names {
            assert!(names.insert(*name), "duplicate alias {name}");
            assert_eq!(*name, name.to_ascii_lowercase());
        }
        assert!(roles.insert(def.role), "duplicate role {:?}", def.role);
        assert!(slots.insert(def.slot), "duplicate slot {:?}", def.slot);
    }

    for role in [RegisterRole::StackPointer, RegisterRole::FramePointer, RegisterRole::InstructionPointer, RegisterRole::Flags] {
        assert!(table.by_role(role).is_some(), "{architecture} has no {role:?}");
    }
}

#[test_case(Architecture::X86 ; "x86")]
#[test_case(Architecture::X86_64 ; "x86_64")]
#[test_case(Architecture::Arm ; "arm")]
#[test_case(Architecture::Arm64 ; "arm64")]
fn test_unfilled_file_reports_nothing(architecture: Architecture)
{
    let regs = RegisterFile::new(architecture);
    for def in architecture.register_table().registers() {
        for name in def.names {
            assert!(regs.lookup(name).is_none(), "{name} visible before fill");
        }
        assert!(regs.by_role(def.role).is_none());
    }
    assert!(regs.lookup("not-a-register").is_none());
    assert!(regs.instruction_pointer().is_none());
    assert!(regs.stack_pointer().is_none());
    assert!(regs.frame_pointer().is_none());
    assert!(regs.flags().is_none());
    assert!(regs.flags_description().is_none());
    assert_eq!(regs.registers().count(), 0);
}

#[test_case(Architecture::X86 ; "x86")]
#[test_case(Architecture::X86_64 ; "x86_64")]
#[test_case(Architecture::Arm ; "arm")]
#[test_case(Architecture::Arm64 ; "arm64")]
fn test_set_on_unfilled_block_is_rejected(architecture: Architecture)
{
    let mut regs = RegisterFile::new(architecture);
    let sp = architecture
        .register_table()
        .by_role(RegisterRole::StackPointer)
        .unwrap()
        .canonical_name();

    assert!(matches!(regs.set(sp, 0x1000u64), Err(CoreError::RegisterUnavailable(name)) if name == sp));
    assert!(regs.is_empty());
    assert!(regs.stack_pointer().is_none());
}

#[test]
fn test_set_unknown_name()
{
    let mut regs = filled(Architecture::Arm64);
    assert!(matches!(regs.set("rax", 1u64), Err(CoreError::UnknownRegister(name)) if name == "rax"));
}

#[test]
fn test_set_through_alias_updates_every_alias()
{
    let mut regs = filled(Architecture::Arm);
    regs.set("SB", 0xcafe_f00du64).unwrap();
    for name in ["r9", "sb", "v6"] {
        assert_eq!(regs.lookup(name).unwrap().as_u64(), 0xcafe_f00d);
    }

    regs.set("lr", 0x1_0000_8000u64).unwrap();
    assert_eq!(regs.lookup("r14").unwrap().as_u64(), 0x8000);
}

#[test]
fn test_set_vector_register()
{
    let mut regs = filled(Architecture::X86_64);
    regs.set("xmm3", 0x0011_2233_4455_6677_8899_aabb_ccdd_eeffu128).unwrap();
    assert_eq!(
        regs.lookup("XMM3").unwrap().value(),
        0x0011_2233_4455_6677_8899_aabb_ccdd_eeff
    );

    let raw: UserFpRegsX86_64 = regs.to_raw().unwrap();
    assert_eq!(raw.xmm(3), Some(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff));
}

#[test]
fn test_vector_block_is_independent()
{
    let mut regs = RegisterFile::new(Architecture::X86_64);
    regs.fill(&UserRegsX86_64::default()).unwrap();
    assert!(regs.is_filled(RegisterBlock::General));
    assert!(!regs.is_filled(RegisterBlock::Vector));
    assert!(regs.lookup("xmm0").is_none());
    assert!(matches!(regs.set("mxcsr", 0u32), Err(CoreError::RegisterUnavailable(_))));

    let mut vector_only = RegisterFile::new(Architecture::X86_64);
    vector_only.fill(&UserFpRegsX86_64::default()).unwrap();
    assert!(vector_only.is_empty());
    assert!(vector_only.stack_pointer().is_none());
    assert_eq!(vector_only.lookup("xmm15").map(|v| v.value()), Some(0));
}

#[test]
fn test_unfilled_blocks_produce_sentinel_contexts()
{
    let empty = RegisterFile::new(Architecture::X86_64);
    assert_eq!(empty.to_raw::<UserRegsX86_64>().unwrap(), UserRegsX86_64::SENTINEL);
    assert_eq!(empty.to_raw::<UserFpRegsX86_64>().unwrap(), UserFpRegsX86_64::SENTINEL);
    assert_eq!(UserRegsX86_64::SENTINEL.rsp, REGISTER_SENTINEL);

    let mut gpr_only = RegisterFile::new(Architecture::Arm64);
    gpr_only.fill(&UserPtRegsArm64::default()).unwrap();
    let (gpr, fpsimd): (UserPtRegsArm64, UserFpsimdArm64) = gpr_only.to_raw().unwrap();
    assert_eq!(gpr, UserPtRegsArm64::default());
    assert_eq!(fpsimd, UserFpsimdArm64::SENTINEL);

    assert_eq!(RegisterFile::new(Architecture::Arm).to_raw::<UserRegsArm>().unwrap().uregs, [u32::MAX; 18]);
}

#[test]
fn test_x86_64_fields_without_names_survive_round_trip()
{
    let gpr = UserRegsX86_64 {
        orig_rax: 39,
        rsp: 0x7ffe_0000,
        ..Default::default()
    };
    let mut fpu = UserFpRegsX86_64 {
        cwd: 0x037f,
        swd: 0x3800,
        ftw: 0x00ff,
        fop: 0x0559,
        rip: 0x40_1234,
        rdp: 0x7ffe_0100,
        mxcsr: 0x1f80,
        mxcr_mask: 0xffbf,
        ..Default::default()
    };
    fpu.st_space[0] = 0x1234;
    fpu.st_space[31] = 0xabcd;
    fpu.padding[23] = 0x5a5a_5a5a;

    let mut regs = RegisterFile::new(Architecture::X86_64);
    regs.fill(&(gpr, fpu)).unwrap();

    let (gpr_out, fpu_out): (UserRegsX86_64, UserFpRegsX86_64) = regs.to_raw().unwrap();
    assert_eq!(gpr_out.orig_rax, 39);
    assert_eq!(gpr_out, gpr);
    assert_eq!(fpu_out, fpu);
}

#[test]
fn test_x86_fxsr_round_trip()
{
    let gpr = UserRegsX86 {
        orig_eax: 4,
        ..Default::default()
    };
    let mut fxsr = UserFxsrX86 {
        cwd: 0x037f,
        twd: 0x0001,
        fip: 0x0804_8000,
        fcs: 0x23,
        foo: 0xbfff_f000,
        fos: 0x2b,
        reserved: 7,
        ..Default::default()
    };
    fxsr.st_space[4] = 0x8000_0000;
    fxsr.padding[55] = 1;

    let mut regs = RegisterFile::new(Architecture::X86);
    regs.fill(&(gpr, fxsr)).unwrap();
    assert_eq!(regs.to_raw::<(UserRegsX86, UserFxsrX86)>().unwrap(), (gpr, fxsr));
}

#[test]
fn test_arm_fields_without_names_survive_round_trip()
{
    let mut gpr = UserRegsArm::default();
    gpr.uregs[17] = 0x1f;
    let fpsimd = UserFpsimdArm64 {
        fpcr: 0x0300_0000,
        reserved: [1, 2],
        ..Default::default()
    };

    let mut regs = RegisterFile::new(Architecture::Arm);
    regs.fill(&gpr).unwrap();
    assert_eq!(regs.to_raw::<UserRegsArm>().unwrap().uregs[17], 0x1f);

    let mut regs = RegisterFile::new(Architecture::Arm64);
    regs.fill(&fpsimd).unwrap();
    assert_eq!(regs.to_raw::<UserFpsimdArm64>().unwrap(), fpsimd);
}

#[test]
fn test_x87_stack_registers()
{
    // 1.0 in st0, a quiet NaN in st1, the rest zero
    let mut fpu = UserFpRegsX86_64::default();
    fpu.st_space[1] = 0x8000_0000;
    fpu.st_space[2] = 0x3fff;
    fpu.st_space[5] = 0xc000_0000;
    fpu.st_space[6] = 0x7fff;
    fpu.st_space[3] = 0x0000_1111; // reserved upper bytes of st0

    let mut regs = RegisterFile::new(Architecture::X86_64);
    regs.fill(&fpu).unwrap();

    let st0 = regs.lookup("st(0)").unwrap();
    assert_eq!(st0, regs.lookup("ST0").unwrap());
    assert_eq!(st0.bits(), 80);
    assert_eq!(st0.value(), 0x3fff_8000_0000_0000_0000);
    assert_eq!(st0.x87_class(), Some(FloatClass::Normal));
    assert_eq!(regs.lookup("st1").and_then(|v| v.x87_class()), Some(FloatClass::QNaN));
    assert_eq!(regs.lookup("st7").and_then(|v| v.x87_class()), Some(FloatClass::Zero));
    assert_eq!(regs.lookup("xmm0").and_then(|v| v.x87_class()), None);

    regs.set("st0", 0u128).unwrap();
    let raw: UserFpRegsX86_64 = regs.to_raw().unwrap();
    assert_eq!(&raw.st_space[..4], &[0, 0, 0, 0x0000_1111]);
    assert!(RegisterFile::new(Architecture::Arm64).table().resolve("st0").is_none());
}

#[test]
fn test_architecture_mismatch()
{
    let mut regs = RegisterFile::new(Architecture::X86_64);
    let err = regs.fill(&UserRegsArm::default()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::ArchitectureMismatch {
            expected: Architecture::X86_64,
            found: Architecture::Arm
        }
    ));
    assert!(regs.is_empty());
    assert!(regs.to_raw::<UserPtRegsArm64>().is_err());
}

#[test]
fn test_clone_is_independent()
{
    let original = filled(Architecture::X86);
    let mut copy = original.clone();
    copy.set("eax", 0xdeadu32).unwrap();

    assert_eq!(original.lookup("eax").unwrap().as_u64(), 0x11);
    assert_eq!(copy.lookup("eax").unwrap().as_u64(), 0xdead);
}

#[test]
fn test_x86_segments_are_sixteen_bits()
{
    let regs = filled(Architecture::X86);
    let gs = regs.lookup("gs").unwrap();
    assert_eq!(gs.bits(), 16);
    assert_eq!(gs.as_u64(), 0x63);
    assert_eq!(gs.to_string(), "gs = 0x0063");
}

#[test]
fn test_flags_description()
{
    let regs = filled(Architecture::X86_64);
    assert_eq!(regs.flags_description().as_deref(), Some("IF"));

    let regs = filled(Architecture::Arm64);
    assert_eq!(regs.flags_description().as_deref(), Some("Z C (EL0t)"));
}

#[test]
fn test_instruction_pointer_and_flags_setters()
{
    let mut regs = filled(Architecture::Arm64);
    regs.set_instruction_pointer(Address::from(0x40_2000)).unwrap();
    regs.set_flags(0x8000_0000).unwrap();

    assert_eq!(regs.lookup("pc").unwrap().as_address(), Address::from(0x40_2000));
    assert_eq!(regs.lookup("cpsr").unwrap().as_u64(), 0x8000_0000);
}

#[test]
fn test_adjust_stack_wraps_at_register_width()
{
    let mut regs = RegisterFile::new(Architecture::Arm);
    regs.fill(&UserRegsArm::default()).unwrap();
    assert_eq!(regs.adjust_stack(-4).unwrap(), Address::from(0xffff_fffc));
}

fn x86_64_regs() -> impl Strategy<Value = UserRegsX86_64>
{
    (proptest::collection::vec(any::<u64>(), 21), proptest::collection::vec(any::<u16>(), 6)).prop_map(|(g, s)| {
        UserRegsX86_64 {
            r15: g[0],
            r14: g[1],
            r13: g[2],
            r12: g[3],
            rbp: g[4],
            rbx: g[5],
            r11: g[6],
            r10: g[7],
            r9: g[8],
            r8: g[9],
            rax: g[10],
            rcx: g[11],
            rdx: g[12],
            rsi: g[13],
            rdi: g[14],
            orig_rax: g[20],
            rip: g[15],
            cs: u64::from(s[0]),
            eflags: g[16],
            rsp: g[17],
            ss: u64::from(s[1]),
            fs_base: g[18],
            gs_base: g[19],
            ds: u64::from(s[2]),
            es: u64::from(s[3]),
            fs: u64::from(s[4]),
            gs: u64::from(s[5]),
        }
    })
}

proptest! {
    #[test]
    fn prop_x86_64_round_trip(raw in x86_64_regs())
    {
        let mut regs = RegisterFile::new(Architecture::X86_64);
        regs.fill(&raw).unwrap();

        prop_assert_eq!(regs.to_raw::<UserRegsX86_64>().unwrap(), raw);
        prop_assert_eq!(regs.stack_pointer(), Some(Address::from(raw.rsp)));
        prop_assert_eq!(regs.frame_pointer(), Some(Address::from(raw.rbp)));
        prop_assert_eq!(regs.instruction_pointer(), Some(Address::from(raw.rip)));
        prop_assert_eq!(regs.flags(), Some(raw.eflags));

        let named = [
            ("rax", raw.rax), ("rcx", raw.rcx), ("rdx", raw.rdx), ("rbx", raw.rbx),
            ("rsi", raw.rsi), ("rdi", raw.rdi), ("r8", raw.r8), ("r9", raw.r9),
            ("r10", raw.r10), ("r11", raw.r11), ("r12", raw.r12), ("r13", raw.r13),
            ("r14", raw.r14), ("r15", raw.r15), ("cs", raw.cs), ("ss", raw.ss),
            ("ds", raw.ds), ("es", raw.es), ("fs", raw.fs), ("gs", raw.gs),
            ("fs_base", raw.fs_base), ("gs_base", raw.gs_base),
        ];
        for (name, value) in named {
            prop_assert_eq!(regs.lookup(name).map(|v| v.as_u64()), Some(value), "{}", name);
        }
    }

    #[test]
    fn prop_arm64_round_trip(
        gprs in uniform31(any::<u64>()),
        sp in any::<u64>(),
        pc in any::<u64>(),
        pstate in any::<u64>(),
        vregs in uniform32(any::<u128>()),
        fpsr in any::<u32>(),
        fpcr in any::<u32>(),
        reserved in any::<[u32; 2]>(),
    )
    {
        let gpr = UserPtRegsArm64 { regs: gprs, sp, pc, pstate };
        let fpsimd = UserFpsimdArm64 { vregs, fpsr, fpcr, reserved };

        let mut regs = RegisterFile::new(Architecture::Arm64);
        regs.fill(&(gpr, fpsimd)).unwrap();

        prop_assert_eq!(regs.to_raw::<(UserPtRegsArm64, UserFpsimdArm64)>().unwrap(), (gpr, fpsimd));
        for (n, value) in gprs.iter().enumerate() {
            prop_assert_eq!(regs.gp_register(n).map(|v| v.as_u64()), Some(*value));
        }
        prop_assert_eq!(regs.lookup("fp").map(|v| v.as_u64()), Some(gprs[29]));
        prop_assert_eq!(regs.lookup("lr").map(|v| v.as_u64()), Some(gprs[30]));
        prop_assert_eq!(regs.stack_pointer(), Some(Address::from(sp)));
        prop_assert_eq!(regs.instruction_pointer(), Some(Address::from(pc)));
        prop_assert_eq!(regs.flags(), Some(pstate));
        for (n, value) in vregs.iter().enumerate() {
            prop_assert_eq!(regs.lookup(&format!("q{n}")).map(|v| v.value()), Some(*value));
        }
        prop_assert_eq!(regs.lookup("fpsr").map(|v| v.as_u64()), Some(u64::from(fpsr)));
    }

    #[test]
    fn prop_arm_round_trip(uregs in uniform18(any::<u32>()))
    {
        let raw = UserRegsArm { uregs };

        let mut regs = RegisterFile::new(Architecture::Arm);
        regs.fill(&raw).unwrap();

        prop_assert_eq!(regs.to_raw::<UserRegsArm>().unwrap(), raw);
        for n in 0..16 {
            prop_assert_eq!(regs.lookup(&format!("r{n}")).map(|v| v.as_u64()), Some(u64::from(uregs[n])));
        }
        prop_assert_eq!(regs.flags(), Some(u64::from(uregs[16])));
        prop_assert_eq!(regs.stack_pointer(), Some(Address::from(u64::from(uregs[13]))));
    }

    #[test]
    fn prop_lookup_is_case_insensitive(upper in proptest::bool::ANY, name_index in 0usize..34)
    {
        let regs = filled(Architecture::Arm64);
        let def = &Architecture::Arm64.register_table().registers()[name_index];
        let name = if upper { def.canonical_name().to_ascii_uppercase() } else { def.canonical_name().to_string() };
        prop_assert_eq!(regs.lookup(&name), regs.lookup(def.canonical_name()));
    }
}
