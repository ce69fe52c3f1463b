//! i386 syscall primitives
//!
//! Uses `int 0x80` with:
//! - eax: syscall number (input), return value (output)
//! - ebx, ecx, edx, esi, edi, ebp: arguments 1-6
//!
//! esi and ebp are reserved by LLVM and cannot be named as asm operands, so
//! the calls that need them save the register on the stack, load the argument
//! from memory inside the asm block, and restore it after the trap.

/// Syscall with 1 argument
#[inline(always)]
pub fn syscall1(nr: usize, a0: usize) -> isize {
    let ret: isize;
    // SAFETY: `int 0x80` traps into the kernel, which validates the number in
    // eax and its arguments and reports failures in eax.
    unsafe {
        core::arch::asm!(
            "int 0x80",
            inlateout("eax") nr => ret,
            in("ebx") a0,
            options(nostack)
        );
    }
    ret
}

/// Syscall with 2 arguments
#[inline(always)]
pub fn syscall2(nr: usize, a0: usize, a1: usize) -> isize {
    let ret: isize;
    // SAFETY: See syscall1.
    unsafe {
        core::arch::asm!(
            "int 0x80",
            inlateout("eax") nr => ret,
            in("ebx") a0,
            in("ecx") a1,
            options(nostack)
        );
    }
    ret
}

/// Syscall with 3 arguments
#[inline(always)]
pub fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> isize {
    let ret: isize;
    // SAFETY: See syscall1.
    unsafe {
        core::arch::asm!(
            "int 0x80",
            inlateout("eax") nr => ret,
            in("ebx") a0,
            in("ecx") a1,
            in("edx") a2,
            options(nostack)
        );
    }
    ret
}

/// Syscall with 4 arguments
#[inline(always)]
pub fn syscall4(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> isize {
    let ret: isize;
    // SAFETY: See syscall1. The 4th argument travels in edi and is moved into
    // esi after esi has been saved; esi is restored before leaving the block.
    unsafe {
        core::arch::asm!(
            "push esi",
            "mov esi, edi",
            "int 0x80",
            "pop esi",
            inlateout("eax") nr => ret,
            in("ebx") a0,
            in("ecx") a1,
            in("edx") a2,
            in("edi") a3,
        );
    }
    ret
}

/// Syscall with 5 arguments
#[inline(always)]
pub fn syscall5(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize, a4: usize) -> isize {
    let ret: isize;
    let spill = [a3, nr];
    // SAFETY: See syscall1. eax carries a pointer to `spill`, which outlives
    // the block; the number is reloaded into eax from it before the trap.
    unsafe {
        core::arch::asm!(
            "push esi",
            "mov esi, [eax]",
            "mov eax, [eax + 4]",
            "int 0x80",
            "pop esi",
            inlateout("eax") spill.as_ptr() as usize => ret,
            in("ebx") a0,
            in("ecx") a1,
            in("edx") a2,
            in("edi") a4,
        );
    }
    ret
}

/// Syscall with 6 arguments
#[inline(always)]
pub fn syscall6(
    nr: usize,
    a0: usize,
    a1: usize,
    a2: usize,
    a3: usize,
    a4: usize,
    a5: usize,
) -> isize {
    let ret: isize;
    let spill = [a3, a5, nr];
    // SAFETY: See syscall5. ebp is saved and restored around the trap, so the
    // frame pointer is intact once the block ends.
    unsafe {
        core::arch::asm!(
            "push ebp",
            "push esi",
            "mov esi, [eax]",
            "mov ebp, [eax + 4]",
            "mov eax, [eax + 8]",
            "int 0x80",
            "pop esi",
            "pop ebp",
            inlateout("eax") spill.as_ptr() as usize => ret,
            in("ebx") a0,
            in("ecx") a1,
            in("edx") a2,
            in("edi") a4,
        );
    }
    ret
}
